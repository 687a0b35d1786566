//! Error types for the Clazz engine
//!
//! Every fallible operation in the engine returns [`ClazzResult`]. Errors are
//! raised synchronously and abort the registration, build or synthesis call
//! in progress.

/// Result type for engine operations
pub type ClazzResult<T> = Result<T, ClazzError>;

/// Broad classification of a [`ClazzError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong shape or type of a parameter
    InvalidArgument,
    /// Wrong shape of a meta attribute
    InvalidClassOption,
    /// A required argument was not supplied
    MissedArgument,
    /// Method lookup failed
    NotExistentMethod,
    /// An abstract placeholder was invoked
    NotImplementedMethod,
    /// Class lookup failed
    NotExistentClass,
    /// Field, static or constant lookup failed
    NotExistentProperty,
    /// Structural rule violation (inheritance, freezing, composition)
    Structure,
}

/// Engine errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClazzError {
    /// Parameter has the wrong shape or type
    #[error("Invalid argument `{argument}`: expected {expected}, got {received}")]
    InvalidArgument {
        /// Argument name
        argument: String,
        /// Expected shape
        expected: String,
        /// Received shape
        received: String,
    },

    /// Meta attribute has the wrong shape
    #[error("Invalid option `{option}` for class \"{class}\": {reason}")]
    InvalidClassOption {
        /// Meta attribute key
        option: String,
        /// Class being processed
        class: String,
        /// What is wrong with it
        reason: String,
    },

    /// Required argument is missing
    #[error("Missed argument `{argument}`")]
    MissedArgument {
        /// Argument name or position
        argument: String,
    },

    /// Method does not exist on the class
    #[error("Method \"{method}\" does not exist in class \"{class}\"")]
    NotExistentMethod {
        /// Class searched
        class: String,
        /// Method name
        method: String,
    },

    /// Abstract placeholder invoked
    #[error("Method \"{method}\" is not implemented in class \"{class}\"")]
    NotImplementedMethod {
        /// Class of the receiver
        class: String,
        /// Method name
        method: String,
    },

    /// Class is not registered
    #[error("Class \"{name}\" does not exist")]
    NotExistentClass {
        /// Requested class name
        name: String,
    },

    /// Field, static member or constant does not exist
    #[error("Property \"{property}\" does not exist in class \"{class}\"")]
    NotExistentProperty {
        /// Class searched
        class: String,
        /// Property name
        property: String,
    },

    /// Class kind is not registered
    #[error("Class kind \"{kind}\" is not registered")]
    UnknownKind {
        /// Requested kind
        kind: String,
    },

    /// Class name already taken
    #[error("Class \"{name}\" already exists")]
    DuplicateClass {
        /// Class name
        name: String,
    },

    /// Class declares itself as parent
    #[error("Class \"{name}\" cannot be its own parent")]
    SelfParent {
        /// Class name
        name: String,
    },

    /// Parent kind is not allowed for this kind
    #[error("{kind} \"{class}\" cannot extend {parent_kind} \"{parent}\"")]
    IncompatibleParent {
        /// Class name
        class: String,
        /// Class kind
        kind: String,
        /// Parent name
        parent: String,
        /// Parent kind
        parent_kind: String,
    },

    /// Parent is final
    #[error("Class \"{class}\" cannot extend final class \"{parent}\"")]
    FinalParent {
        /// Class name
        class: String,
        /// Final parent name
        parent: String,
    },

    /// Class (or an ancestor) already produced an instance
    #[error("Class \"{class}\" cannot be changed: an instance has already been created")]
    InstanceCreated {
        /// Class name
        class: String,
    },

    /// Name listed in `$_implements` is not an interface
    #[error("Class \"{class}\" cannot implement \"{name}\": it is not an interface")]
    NotAnInterface {
        /// Implementing class
        class: String,
        /// Offending name
        name: String,
    },

    /// Name listed in `$_traits` is not a trait
    #[error("Class \"{class}\" cannot use \"{name}\": it is not a trait")]
    NotATrait {
        /// Composing class
        class: String,
        /// Offending name
        name: String,
    },

    /// Concrete class leaves abstract methods unimplemented
    #[error("Class \"{class}\" must implement abstract methods: {}", methods.join(", "))]
    MissingAbstractMethods {
        /// Class name
        class: String,
        /// Every missing method name
        methods: Vec<String>,
    },

    /// Kind does not allow instances
    #[error("{kind} \"{class}\" cannot be instantiated")]
    NotInstantiable {
        /// Class name
        class: String,
        /// Class kind
        kind: String,
    },

    /// Operation disabled for this kind
    #[error("Operation `{operation}` is not supported by {kind}")]
    UnsupportedOperation {
        /// Class kind
        kind: String,
        /// Operation name
        operation: String,
    },

    /// Parent chain loops back onto itself
    #[error("Inheritance cycle detected at class \"{class}\"")]
    InheritanceCycle {
        /// Class where the cycle was detected
        class: String,
    },

    /// Two traits provide the same member
    #[error("Class \"{class}\": member \"{member}\" is provided by both \"{first}\" and \"{second}\"")]
    TraitConflict {
        /// Composing class
        class: String,
        /// Member name
        member: String,
        /// Trait applied first
        first: String,
        /// Trait applied later
        second: String,
    },

    /// Malformed definition body
    #[error("Invalid definition for class \"{class}\": {reason}")]
    InvalidDefinition {
        /// Class name
        class: String,
        /// What is wrong with it
        reason: String,
    },

    /// New member assigned to a sealed instance
    #[error("Cannot add property \"{property}\" to sealed instance of \"{class}\"")]
    SealedInstance {
        /// Class of the instance
        class: String,
        /// Property name
        property: String,
    },

    /// Class record or its manager is gone
    #[error("Class \"{class}\" is detached from its manager")]
    Detached {
        /// Class name
        class: String,
    },

    /// Class loader failed
    #[error("Failed to load class \"{name}\": {reason}")]
    Loader {
        /// Class name
        name: String,
        /// Loader message
        reason: String,
    },
}

impl ClazzError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClazzError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ClazzError::InvalidClassOption { .. } => ErrorKind::InvalidClassOption,
            ClazzError::MissedArgument { .. } => ErrorKind::MissedArgument,
            ClazzError::NotExistentMethod { .. } => ErrorKind::NotExistentMethod,
            ClazzError::NotImplementedMethod { .. } => ErrorKind::NotImplementedMethod,
            ClazzError::NotExistentClass { .. } => ErrorKind::NotExistentClass,
            ClazzError::NotExistentProperty { .. } => ErrorKind::NotExistentProperty,
            _ => ErrorKind::Structure,
        }
    }

    /// Shorthand for [`ClazzError::InvalidArgument`]
    pub fn invalid_argument(
        argument: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        ClazzError::InvalidArgument {
            argument: argument.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    /// Shorthand for [`ClazzError::UnsupportedOperation`]
    pub fn unsupported(kind: impl Into<String>, operation: impl Into<String>) -> Self {
        ClazzError::UnsupportedOperation {
            kind: kind.into(),
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_methods_are_listed_together() {
        let err = ClazzError::MissingAbstractMethods {
            class: "Person".to_string(),
            methods: vec!["hello".to_string(), "bye".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Class \"Person\" must implement abstract methods: hello, bye"
        );
        assert_eq!(err.kind(), ErrorKind::Structure);
    }

    #[test]
    fn test_error_kinds() {
        let err = ClazzError::invalid_argument("name", "non-empty string", "\"\"");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("non-empty string"));

        let err = ClazzError::NotExistentClass {
            name: "Ghost".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotExistentClass);
    }
}
