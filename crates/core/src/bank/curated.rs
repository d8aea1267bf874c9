use std::collections::BTreeMap;

use crate::model::{Band, ItemDraft};

/// Topic name of the built-in inheritance catalog.
pub const INHERITANCE_TOPIC: &str = "inheritance oops";

const INHERITANCE_SUBSKILL: &str = "inheritance";

/// Hand-written items a bank is seeded and padded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuratedSource {
    topic: String,
    entries: BTreeMap<Band, Vec<ItemDraft>>,
}

impl CuratedSource {
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Replace the entries for one band.
    #[must_use]
    pub fn with_band(mut self, band: Band, entries: Vec<ItemDraft>) -> Self {
        self.entries.insert(band, entries);
        self
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn entries(&self, band: Band) -> &[ItemDraft] {
        self.entries.get(&band).map_or(&[], Vec::as_slice)
    }

    /// Object-oriented inheritance catalog, twelve entries per band.
    #[must_use]
    pub fn inheritance() -> Self {
        let band = |rows: &[(&str, [&str; 4])]| -> Vec<ItemDraft> {
            rows.iter()
                .map(|(stem, options)| {
                    ItemDraft::new(*stem, *options, 0).with_subskill(INHERITANCE_SUBSKILL)
                })
                .collect()
        };
        Self::new(INHERITANCE_TOPIC)
            .with_band(Band::Easy, band(EASY))
            .with_band(Band::Medium, band(MEDIUM))
            .with_band(Band::Hard, band(HARD))
    }
}

// The first option of every row is the correct one; items shuffle on build.

const EASY: &[(&str, [&str; 4])] = &[
    (
        "Which best describes inheritance in OOP?",
        [
            "A class acquiring properties/behavior of another",
            "Compiling code to bytecode",
            "Only data hiding",
            "Linking external libraries",
        ],
    ),
    (
        "Single inheritance means a class inherits from:",
        [
            "Exactly one base class",
            "Two unrelated classes",
            "Any number of classes",
            "Only interfaces/abstract types",
        ],
    ),
    (
        "Which feature allows a subclass to provide its own method body?",
        ["Overriding", "Overloading", "Encapsulation", "Serialization"],
    ),
    (
        "Which relationship signals inheritance?",
        ["is-a", "has-a", "uses-a", "contains-a"],
    ),
    (
        "Overriding occurs when:",
        [
            "Subclass defines same signature and replaces behavior",
            "Two methods share name but different params",
            "A private method is redefined",
            "A static method is hidden",
        ],
    ),
    (
        "What is inherited by default?",
        [
            "Public/protected members (language-specific)",
            "Private members directly",
            "Local variables",
            "Constructors",
        ],
    ),
    (
        "Polymorphism enables:",
        [
            "Base reference invoking subclass override",
            "Subclass holding any base instance",
            "Compile-time only behavior",
            "Direct access to private base fields",
        ],
    ),
    (
        "Access modifier most restrictive for subclasses:",
        ["private", "protected", "public", "internal"],
    ),
    (
        "In Python, base listed first in C(B,A) affects:",
        ["MRO order", "Constructor overloading", "Static binding", "Access modifiers"],
    ),
    (
        "Which is NOT about inheritance?",
        ["Compiling to executable", "Sharing behavior", "Code reuse", "Specialization"],
    ),
    (
        "Abstract classes allow:",
        [
            "Defining template methods for subclasses",
            "Instantiating directly",
            "Only static members",
            "Multiple constructors only",
        ],
    ),
    (
        "Interfaces express:",
        [
            "Contract for behavior across classes",
            "Concrete state sharing",
            "Private inheritance",
            "File I/O rules",
        ],
    ),
];

const MEDIUM: &[(&str, [&str; 4])] = &[
    (
        "Class B extends A and overrides f(). What does B().f() call?",
        [
            "B.f (overridden in subclass)",
            "A.f always",
            "Both A.f then B.f automatically",
            "Neither, unless super() is used",
        ],
    ),
    (
        "Which is TRUE about method overriding?",
        [
            "Same signature in subclass replaces base behavior at runtime",
            "Requires a different return type",
            "Only works on private methods",
            "Happens at compile time",
        ],
    ),
    (
        "Polymorphism with collections works because:",
        [
            "A list of A can hold instances of subclasses of A",
            "A list of B can hold A",
            "Subclasses can hold bases",
            "Only primitives are polymorphic",
        ],
    ),
    (
        "Calling super.f() in a subclass does what?",
        [
            "Invokes the base implementation explicitly",
            "Prevents overriding",
            "Skips dynamic dispatch",
            "Calls the subclass method",
        ],
    ),
    (
        "Composition vs inheritance: prefer composition when:",
        [
            "You need a has-a relationship and flexible reuse",
            "You want is-a specialization",
            "You need MRO",
            "You need protected access",
        ],
    ),
    (
        "Which statement about protected members is typical?",
        [
            "Accessible in subclass but not by unrelated classes",
            "Accessible everywhere",
            "Hidden from subclass",
            "Only for interfaces",
        ],
    ),
    (
        "Overloading vs overriding difference:",
        [
            "Overloading: same name diff params; overriding: same signature new impl",
            "Overloading: runtime; overriding: compile-time",
            "Overloading hides base",
            "Overriding requires static",
        ],
    ),
    (
        "Dynamic dispatch means:",
        [
            "Call target resolved at runtime based on object type",
            "Compiler chooses function at compile time",
            "No virtual methods",
            "Only static methods used",
        ],
    ),
    (
        "When might inheritance be harmful?",
        [
            "Tight coupling and fragile base-class problem",
            "When using interfaces",
            "When encapsulating variation",
            "When doing dependency inversion",
        ],
    ),
    (
        "Liskov Substitution Principle implies:",
        [
            "Subtypes must be usable wherever supertypes are expected",
            "Subtypes must expose all fields",
            "Subtypes must be final",
            "Only single inheritance allowed",
        ],
    ),
    (
        "In Python, super().__init__ is needed to:",
        [
            "Initialize base state explicitly in subclass",
            "Disable overriding",
            "Change MRO",
            "Hide base attributes",
        ],
    ),
    (
        "In Java, @Override helps:",
        [
            "Catch signature mismatches at compile-time",
            "Enable multiple inheritance",
            "Create virtual methods",
            "Access private base members",
        ],
    ),
];

const HARD: &[(&str, [&str; 4])] = &[
    (
        "In Python, MRO (C3) for class C(A,B) typically resolves methods as:",
        [
            "C -> A -> B -> object (consistent linearization)",
            "C -> B -> A -> object",
            "A -> B -> C -> object",
            "Arbitrary at runtime",
        ],
    ),
    (
        "The diamond problem is mitigated primarily by:",
        [
            "A defined method resolution order / virtual inheritance",
            "Multiple dispatch by default",
            "Compile-time templates",
            "Name mangling of private members",
        ],
    ),
    (
        "In Java, which statement about inheritance is correct?",
        [
            "A class can extend one class and implement multiple interfaces",
            "A class can extend multiple concrete classes",
            "Private members are directly accessible to subclasses",
            "Constructors are inherited",
        ],
    ),
    (
        "Fragile base-class arises when:",
        [
            "Changes in base break subclasses unexpectedly",
            "Subclasses violate LSP",
            "Multiple interfaces conflict",
            "Static members override",
        ],
    ),
    (
        "Virtual inheritance in C++ solves:",
        [
            "Diamond duplication of base",
            "Operator overloading",
            "Template specialization",
            "Name lookup ambiguity only",
        ],
    ),
    (
        "MRO linearization consistency requires:",
        [
            "Preserving local precedence order",
            "Alphabetic class names",
            "Depth-first search",
            "Breadth-first search",
        ],
    ),
    (
        "Sealed/final classes affect inheritance by:",
        [
            "Preventing further subclassing",
            "Forcing multiple inheritance",
            "Allowing private overriding",
            "Disabling constructors",
        ],
    ),
    (
        "Covariant returns in overriding allow:",
        [
            "Subclass method to return subtype of base method's return",
            "Any unrelated type",
            "Only exact same type",
            "Primitives only",
        ],
    ),
    (
        "Mixins are typically used to:",
        [
            "Inject reusable behavior orthogonally",
            "Provide single concrete base",
            "Replace composition",
            "Break encapsulation",
        ],
    ),
    (
        "Method hiding (static) differs from overriding because:",
        [
            "Binding is static; does not participate in dynamic dispatch",
            "Binding is dynamic at runtime",
            "It changes the vtable of instances",
            "It guarantees polymorphism",
        ],
    ),
    (
        "Multiple inheritance risks:",
        [
            "Ambiguous bases and state duplication",
            "Compile times",
            "Garbage collection",
            "Operator precedence",
        ],
    ),
    (
        "Subtype variance rules (e.g., PECS in Java) relate to:",
        [
            "Generics and inheritance boundaries",
            "MRO only",
            "Access modifiers",
            "Serialization",
        ],
    ),
];
