use parking_lot::Mutex;

use super::error::{Error, Result};

enum InitState {
  Pending,
  Done,
  Failed(String),
}

/// Execute-once guard for store initialization.
///
/// The first caller runs the initializer while holding the lock, so
/// concurrent callers block until it has finished and then observe its
/// outcome. The initializer never runs twice, even if it failed.
pub struct InitOnce {
  state: Mutex<InitState>,
}

impl InitOnce {
  pub fn new() -> Self {
    Self {
      state: Mutex::new(InitState::Pending),
    }
  }

  pub fn call_once<F>(&self, f: F) -> Result<()>
  where
    F: FnOnce() -> Result<()>,
  {
    let mut state = self.state.lock();
    match &*state {
      InitState::Done => Ok(()),
      InitState::Failed(msg) => Err(Error::Init(msg.clone())),
      InitState::Pending => {
        let result = f();
        *state = match &result {
          Ok(()) => InitState::Done,
          Err(e) => InitState::Failed(e.to_string()),
        };
        result
      }
    }
  }

  pub fn is_done(&self) -> bool {
    matches!(*self.state.lock(), InitState::Done)
  }
}

impl Default for InitOnce {
  fn default() -> Self {
    Self::new()
  }
}
