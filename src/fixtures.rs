#[cfg(test)]
pub mod test {
    use std::sync::Arc;
    use std::sync::mpsc::Sender;
    use std::time::Duration;

    use crate::{Conf, Fields};

    #[derive(Conf, Debug, Clone, PartialEq)]
    pub struct AppConfig {
        #[conf(usage = "Application name")]
        pub name: String,

        pub verbose: bool,

        #[conf(nested)]
        pub server: ServerConfig,

        #[conf(nested)]
        pub database: DatabaseConfig,

        #[conf(nested, skip, redact)]
        pub internal: InternalConfig,

        #[conf(skip)]
        pub scratch: String,

        pub tags: Vec<String>,

        token: String,
    }

    impl AppConfig {
        pub fn with_token(mut self, token: &str) -> Self {
            self.token = token.to_string();
            self
        }

        pub fn token(&self) -> &str {
            &self.token
        }
    }

    impl Default for AppConfig {
        fn default() -> Self {
            Self {
                name: "demo".into(),
                verbose: false,
                server: ServerConfig::default(),
                database: DatabaseConfig::default(),
                internal: InternalConfig {
                    secret: "xyz".into(),
                    level: 3,
                },
                scratch: String::new(),
                tags: vec!["a".into()],
                token: String::new(),
            }
        }
    }

    #[derive(Conf, Debug, Clone, PartialEq)]
    pub struct ServerConfig {
        pub host: String,

        #[conf(name = "p", usage = "Port to listen on")]
        pub port: u32,

        pub timeout: Duration,

        #[conf(nested)]
        pub tls: TlsConfig,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: "localhost".into(),
                port: 8080,
                timeout: Duration::from_secs(30),
                tls: TlsConfig::default(),
            }
        }
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct TlsConfig {
        pub cert: String,

        #[conf(redact)]
        pub key: String,
    }

    #[derive(Conf, Debug, Clone, PartialEq)]
    pub struct DatabaseConfig {
        pub url: String,

        #[conf(redact = "true")]
        pub password: String,

        #[conf(name = "pool", usage = "Connection pool size")]
        pub pool_size: i64,
    }

    impl Default for DatabaseConfig {
        fn default() -> Self {
            Self {
                url: "postgres://localhost/app".into(),
                password: "hunter2".into(),
                pool_size: 5,
            }
        }
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct InternalConfig {
        pub secret: String,
        pub level: i32,
    }

    // -- One field per flag kind -----------------------------------------------

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct AllKinds {
        pub flag: bool,
        pub wait: Duration,
        pub ratio: f64,
        pub count: i32,
        pub offset: i64,
        pub label: String,
        pub small: u32,
        pub big: u64,
    }

    // -- Redaction fixtures ----------------------------------------------------

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct Credentials {
        pub username: String,

        #[conf(redact = "true")]
        pub password: String,

        #[conf(redact = "false")]
        pub innocent: Vec<u8>,

        #[conf(redact = "1")]
        pub secret: Vec<u8>,
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct Flags {
        #[conf(redact = "true")]
        pub s1: String,
        #[conf(redact = "t")]
        pub s2: String,
        #[conf(redact = "false")]
        pub s3: String,
        #[conf(redact = "f")]
        pub s4: String,
        pub s5: String,
        #[conf(redact)]
        pub s6: String,
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct BadTag {
        #[conf(redact = "notbool")]
        pub s: String,
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct Shared {
        pub data: Arc<Vec<i32>>,

        #[conf(redact)]
        pub hidden: Arc<Vec<i32>>,
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct Hidden {
        pub visible: String,

        #[conf(nested)]
        inner: Inner,
    }

    impl Hidden {
        pub fn new(visible: &str, a: &str, b: u64) -> Self {
            Self {
                visible: visible.to_string(),
                inner: Inner {
                    a: a.to_string(),
                    b,
                },
            }
        }
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct Inner {
        pub a: String,
        pub b: u64,
    }

    // -- Struct-typed fields without `nested` ----------------------------------

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct Service {
        pub name: String,
        pub db: DbLogin,
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct DbLogin {
        pub user: String,
        #[conf(redact)]
        pub password: String,
        pub max_conns: i32,
    }

    // -- Binding-only structs and name collisions -------------------------------

    #[derive(Fields)]
    pub struct WithHook {
        pub port: u32,
        pub hook: fn() -> u32,
        pub tx: Sender<u8>,
    }

    #[derive(Conf, Debug, Clone, Default, PartialEq)]
    pub struct WithHelp {
        pub help: String,
        pub port: u32,
    }

    #[test]
    fn derive_builds_field_table() {
        let meta = AppConfig::default().meta();
        assert_eq!(meta.len(), 8);
        assert_eq!(meta[0].ident, "name");
        assert_eq!(meta[0].usage, Some("Application name"));
        assert!(meta[2].nested);
        assert!(meta[4].is_skipped());
        assert_eq!(meta[4].redact, Some("true"));
        assert!(!meta[7].exported);
    }
}
