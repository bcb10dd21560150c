use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Holds the process-wide environment lock and restores every variable it
/// touched when dropped. Tests that read or write environment variables go
/// through this so they cannot observe each other's overrides.
#[must_use]
pub struct ScopedEnv {
    _lock: MutexGuard<'static, ()>,
    saved: HashMap<OsString, Option<OsString>>,
}

impl ScopedEnv {
    pub fn lock() -> Self {
        Self {
            _lock: ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner()),
            saved: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl AsRef<OsStr>) {
        let key = key.into();
        self.save(&key);
        unsafe {
            env::set_var(&key, value);
        }
    }

    pub fn remove(&mut self, key: impl Into<OsString>) {
        let key = key.into();
        self.save(&key);
        unsafe {
            env::remove_var(&key);
        }
    }

    // only the first touch of a key records it, so the pre-guard value wins
    fn save(&mut self, key: &OsStr) {
        self.saved
            .entry(key.to_os_string())
            .or_insert_with(|| env::var_os(key));
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain() {
            match previous {
                Some(value) => unsafe { env::set_var(&key, value) },
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_env_restores_on_drop() {
        let key = "SKLMAN_SCOPED_ENV_TEST";
        {
            let mut guard = ScopedEnv::lock();
            guard.set(key, "outer");
            guard.set(key, "inner");
            assert_eq!(env::var(key).as_deref(), Ok("inner"));
        }
        // the key did not exist before the guard, so it is gone again
        assert!(env::var_os(key).is_none());

        {
            let mut guard = ScopedEnv::lock();
            guard.set(key, "kept");
            guard.remove(key);
            assert!(env::var_os(key).is_none());
        }
        assert!(env::var_os(key).is_none());
    }
}
