//! This module provides ways to tweak mocked event sources, so that they can return errors on some tests

use crate::traits::SourceError;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the EventSource trait
    pub list_behaviour: (u32, u32),
    pub create_behaviour: (u32, u32),
    pub update_behaviour: (u32, u32),
    pub delete_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_behaviour: (0, n_fails),
            create_behaviour: (0, n_fails),
            update_behaviour: (0, n_fails),
            delete_behaviour: (0, n_fails),
        }
    }

    /// Only mutations (create, update, delete) will fail, for `n_fails` times. Listing always works
    pub fn fail_mutations(n_fails: u32) -> Self {
        Self {
            list_behaviour: (0, 0),
            ..Self::fail_now(n_fails)
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list(&mut self) -> Result<(), SourceError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_behaviour, "list")
    }
    pub fn can_create(&mut self) -> Result<(), SourceError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_behaviour, "create")
    }
    pub fn can_update(&mut self) -> Result<(), SourceError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_behaviour, "update")
    }
    pub fn can_delete(&mut self) -> Result<(), SourceError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_behaviour, "delete")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), SourceError> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_list().is_ok());
        assert!(ok.can_list().is_ok());
        assert!(ok.can_update().is_ok());
        assert!(ok.can_delete().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_list().is_err());
        assert!(now.can_create().is_err());
        assert!(now.can_create().is_err());
        assert!(now.can_list().is_err());
        assert!(now.can_list().is_ok());
        assert!(now.can_list().is_ok());
        assert!(now.can_create().is_ok());

        let mut custom = MockBehaviour{
            list_behaviour: (0,1),
            update_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_list().is_err());
        assert!(custom.can_list().is_ok());
        assert!(custom.can_list().is_ok());
        assert!(custom.can_update().is_ok());
        assert!(custom.can_update().is_err());
        assert!(custom.can_update().is_err());
        assert!(custom.can_update().is_err());
        assert!(custom.can_update().is_ok());
        assert!(custom.can_update().is_ok());
    }

    #[test]
    fn test_suspend_and_mutations_only() {
        let mut mutations = MockBehaviour::fail_mutations(1);
        assert!(mutations.can_list().is_ok());
        assert!(mutations.can_delete().is_err());
        assert!(mutations.can_delete().is_ok());

        let mut suspended = MockBehaviour::fail_now(5);
        suspended.suspend();
        assert!(suspended.can_update().is_ok());
        suspended.resume();
        assert!(suspended.can_update().is_err());
    }
}
