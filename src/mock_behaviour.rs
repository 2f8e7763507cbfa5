//! This module provides ways to tweak mocked task sources, so that they can return errors on some tests

use std::error::Error;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the TaskSource trait
    pub get_tasks_behaviour: (u32, u32),
    pub add_task_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            get_tasks_behaviour: (0, n_fails),
            add_task_behaviour: (0, n_fails),
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

    pub fn can_get_tasks(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_tasks_behaviour, "get_tasks")
    }
    pub fn can_add_task(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.add_task_behaviour, "add_task")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        for _ in 0..5 {
            assert!(ok.can_get_tasks().is_ok());
            assert!(ok.can_add_task().is_ok());
        }

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_get_tasks().is_err());
        assert!(now.can_add_task().is_err());
        assert!(now.can_add_task().is_err());
        assert!(now.can_get_tasks().is_err());
        assert!(now.can_get_tasks().is_ok());
        assert!(now.can_add_task().is_ok());

        let mut custom = MockBehaviour{
            add_task_behaviour: (1, 2),
            ..MockBehaviour::default()
        };
        assert!(custom.can_get_tasks().is_ok());
        assert!(custom.can_add_task().is_ok());
        assert!(custom.can_add_task().is_err());
        assert!(custom.can_add_task().is_err());
        assert!(custom.can_add_task().is_ok());
    }

    #[test]
    fn test_suspended_behaviour() {
        let mut behaviour = MockBehaviour::fail_now(1);
        behaviour.suspend();
        assert!(behaviour.can_get_tasks().is_ok());
        behaviour.resume();
        assert!(behaviour.can_get_tasks().is_err());
        assert!(behaviour.can_get_tasks().is_ok());
    }
}
