//! Class loading seam
//!
//! Before a definition is processed, every class name it references is
//! handed to the manager's [`ClassLoader`] unless that name is already
//! registered. The loader may register the class (re-entering the manager)
//! or do nothing; unresolved names surface later as `NotExistentClass`.

use crate::error::ClazzResult;
use crate::manager::ClassManager;

/// Provides classes on demand
pub trait ClassLoader: Send + Sync {
    /// Make `name` available in `manager`, if this loader knows it
    fn load(&self, name: &str, manager: &ClassManager) -> ClazzResult<()>;
}

/// Loader that never provides anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoader;

impl ClassLoader for NoopLoader {
    fn load(&self, _name: &str, _manager: &ClassManager) -> ClazzResult<()> {
        Ok(())
    }
}

impl<F> ClassLoader for F
where
    F: Fn(&str, &ClassManager) -> ClazzResult<()> + Send + Sync,
{
    fn load(&self, name: &str, manager: &ClassManager) -> ClazzResult<()> {
        self(name, manager)
    }
}
