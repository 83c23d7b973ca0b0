#[cfg(test)]
pub(crate) fn with_temp_home<F, R>(func: F) -> R
where
    F: FnOnce(&std::path::Path) -> R,
{
    let _guard = env_lock();
    let dir = tempfile::tempdir().expect("tempdir");
    let old_home = std::env::var("HOME").ok();
    unsafe {
        std::env::set_var("HOME", dir.path());
    }
    let result = func(dir.path());
    unsafe {
        match old_home {
            Some(old) => std::env::set_var("HOME", old),
            None => std::env::remove_var("HOME"),
        }
    }
    result
}

#[cfg(test)]
pub(crate) fn with_env_var<F, R>(key: &str, value: Option<&str>, func: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = env_lock();
    let old = std::env::var(key).ok();
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    let result = func();
    unsafe {
        match old {
            Some(old) => std::env::set_var(key, old),
            None => std::env::remove_var(key),
        }
    }
    result
}

#[cfg(test)]
fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
    ENV_MUTEX.lock().expect("env lock")
}
