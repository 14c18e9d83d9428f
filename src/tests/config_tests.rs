#[cfg(test)]
mod tests {
    use crate::config::Config;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure config tests run sequentially to avoid race conditions
    static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 5] = [
        "MONGOURI",
        "MONGO_DATABASE",
        "SERVER_ADDRESS",
        "REQUEST_TIMEOUT_SECONDS",
        "CONNECT_TIMEOUT_SECONDS",
    ];

    // Helper function to safely run a test with environment isolation
    fn run_with_env_isolation<F, R>(test_fn: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let original_values: Vec<(String, Option<String>)> = KEYS
            .iter()
            .map(|key| (key.to_string(), env::var(key).ok()))
            .collect();

        for (key, _) in &original_values {
            env::remove_var(key);
        }

        let result = test_fn();

        for (key, original_value) in original_values {
            env::remove_var(&key);
            if let Some(value) = original_value {
                env::set_var(&key, value);
            }
        }

        result
    }

    #[test]
    fn test_defaults() {
        run_with_env_isolation(|| {
            let config = Config::from_env().unwrap();
            assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
            assert_eq!(config.database_name, "goLangApi");
            assert_eq!(config.server_address, "0.0.0.0:8000");
            assert_eq!(config.request_timeout, Duration::from_secs(10));
            assert_eq!(config.connect_timeout, Duration::from_secs(10));
        });
    }

    #[test]
    fn test_values_from_env() {
        run_with_env_isolation(|| {
            env::set_var("MONGOURI", "mongodb://db.internal:27017");
            env::set_var("MONGO_DATABASE", "people");
            env::set_var("SERVER_ADDRESS", "127.0.0.1:9000");
            env::set_var("REQUEST_TIMEOUT_SECONDS", " 3 ");
            env::set_var("CONNECT_TIMEOUT_SECONDS", "20");

            let config = Config::from_env().unwrap();

            assert_eq!(config.mongo_uri, "mongodb://db.internal:27017");
            assert_eq!(config.database_name, "people");
            assert_eq!(config.server_address, "127.0.0.1:9000");
            assert_eq!(config.request_timeout, Duration::from_secs(3));
            assert_eq!(config.connect_timeout, Duration::from_secs(20));
        });
    }

    #[test]
    fn test_invalid_timeouts_are_rejected() {
        run_with_env_isolation(|| {
            env::set_var("REQUEST_TIMEOUT_SECONDS", "ten");
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("REQUEST_TIMEOUT_SECONDS"));

            env::set_var("REQUEST_TIMEOUT_SECONDS", "0");
            assert!(Config::from_env().is_err());
        });
    }
}
