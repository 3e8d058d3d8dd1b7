use log::{debug, error, info};

use crate::BatchError;

/// Transaction boundary offered by the host storage.
///
/// Every account, identity and enrollment mutation performed while a
/// [`WorkScope`] is open belongs to the same transaction.
pub trait TransactionManager {
    fn begin(&self) -> Result<(), BatchError>;
    fn commit(&self) -> Result<(), BatchError>;
    fn rollback(&self) -> Result<(), BatchError>;
}

/// For hosts whose storage applies each mutation immediately.
#[derive(Default)]
pub struct NoTransaction;

impl TransactionManager for NoTransaction {
    fn begin(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn commit(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn rollback(&self) -> Result<(), BatchError> {
        Ok(())
    }
}

/// One open unit of work.
///
/// A scope is finished exactly once, through [`WorkScope::commit`] or
/// [`WorkScope::rollback`]. A scope dropped while still open (an error escaped
/// the batch) is rolled back.
pub struct WorkScope<'a> {
    manager: &'a dyn TransactionManager,
    open: bool,
}

impl<'a> WorkScope<'a> {
    pub fn begin(manager: &'a dyn TransactionManager) -> Result<WorkScope<'a>, BatchError> {
        manager.begin()?;
        debug!("Unit of work opened");
        Ok(WorkScope {
            manager,
            open: true,
        })
    }

    /// A failed commit leaves the scope open, so it is rolled back on drop.
    pub fn commit(mut self) -> Result<(), BatchError> {
        self.manager.commit()?;
        self.open = false;
        info!("Unit of work committed");
        Ok(())
    }

    pub fn rollback(mut self) -> Result<(), BatchError> {
        self.open = false;
        self.manager.rollback()?;
        info!("Unit of work rolled back");
        Ok(())
    }
}

impl Drop for WorkScope<'_> {
    fn drop(&mut self) {
        if self.open {
            match self.manager.rollback() {
                Ok(()) => info!("Unit of work rolled back"),
                Err(err) => error!("Unit of work could not be rolled back: {}", err),
            }
        }
    }
}
