//! Integration tests for config file parsing.
//!
//! Covers the three parse plans end to end:
//! - loose: the record's own schema with every leaf read as a string
//! - in place: an all-string record resolved directly
//! - strict: a separately declared all-string shape coerced into a typed record

use confbind::{
    BraceEnvironmentLoader, ConfigError, ConfigFileParser, ConfigSchema, EnvError,
    EnvironmentLoader, Field, FieldError, FileConfiguration, FileFormat, IntWidth, Schema,
    ShapePlan,
};
use confbind::config::SchemaError;
use serde::Deserialize;
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Db {
    host: String,
    port: i32,
}

impl ConfigSchema for Db {
    fn schema() -> Schema {
        Schema::new("Db")
            .field(Field::string("Host").key("host"))
            .field(Field::int_width("Port", IntWidth::I32).key("port"))
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Service {
    port: i64,
    #[serde(rename = "service-name")]
    service_name: String,
    db: Db,
}

impl ConfigSchema for Service {
    fn schema() -> Schema {
        Schema::new("Service")
            .field(Field::int("Port").key("port"))
            .field(Field::string("ServiceName").key("service-name"))
            .field(Field::nested("DB", Db::schema()).key("db"))
    }
}

/// File shape for the strict pass.
struct RawService;

impl ConfigSchema for RawService {
    fn schema() -> Schema {
        Schema::new("RawService")
            .field(Field::string("Port").key("port"))
            .field(Field::string("ServiceName").key("service-name"))
            .field(
                Field::nested(
                    "DB",
                    Schema::new("RawDb")
                        .field(Field::string("Host").key("host"))
                        .field(Field::string("Port").key("port")),
                )
                .key("db"),
            )
    }
}

/// All-string record for the in-place pass.
#[derive(Debug, Deserialize, PartialEq)]
struct Endpoints {
    public: String,
    internal: String,
}

impl ConfigSchema for Endpoints {
    fn schema() -> Schema {
        Schema::new("Endpoints")
            .field(Field::string("Public").key("public"))
            .field(Field::string("Internal").key("internal"))
    }
}

/// Loader that passes values through unchanged and counts calls.
#[derive(Default)]
struct CountingLoader {
    calls: Cell<usize>,
}

impl EnvironmentLoader for CountingLoader {
    fn load_string(&self, raw: &str) -> Result<String, EnvError> {
        self.calls.set(self.calls.get() + 1);
        Ok(raw.to_string())
    }
}

fn no_vars() -> BraceEnvironmentLoader {
    BraceEnvironmentLoader::with_vars(Vec::<(String, String)>::new())
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn service_yaml(db_port: &str) -> String {
    format!(
        "port: \"8080\"\nservice-name: api\ndb:\n  host: localhost\n  port: \"{}\"\n",
        db_port
    )
}

mod loose_tests {
    use super::*;

    #[test]
    fn binds_placeholder_free_yaml() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", &service_yaml("5432"));
        let parser = ConfigFileParser::<Service>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap();

        let config = parser.parse().expect("config should bind");
        assert_eq!(
            config,
            Service {
                port: 8080,
                service_name: "api".into(),
                db: Db {
                    host: "localhost".into(),
                    port: 5432,
                },
            }
        );
    }

    #[test]
    fn empty_nested_leaf_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", &service_yaml(""));
        let parser = ConfigFileParser::<Service>::loose(FileConfiguration::new(
            path.clone(),
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap();

        let err = parser.parse().unwrap_err();
        assert_eq!(
            err.field_errors(),
            &[FieldError::new("Port: ", "field is empty")]
        );
        let rendered = err.to_string();
        assert!(rendered.contains("Port:  - 'field is empty'"), "{rendered}");
        assert!(rendered.starts_with(&format!(
            "found 1 error(s) while parsing YAML config file({}):",
            path.display()
        )));
    }

    #[test]
    fn unquoted_yaml_numbers_bind() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "app.yaml",
            "port: 8080\nservice-name: api\ndb:\n  host: localhost\n  port: 5432\n",
        );
        let config = ConfigFileParser::<Service>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap()
        .parse()
        .unwrap();
        assert_eq!(config.db.port, 5432);
    }

    #[test]
    fn placeholders_resolve_from_loader() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "app.properties",
            "port = \"${PORT}\"\nservice-name = \"${NAME}\"\n\n[db]\nhost = \"${DB_HOST}\"\nport = \"${DB_PORT}\"\n",
        );
        let loader = BraceEnvironmentLoader::with_vars([
            ("PORT", "9090"),
            ("NAME", "billing"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6432"),
        ]);
        let config = ConfigFileParser::<Service>::loose(FileConfiguration::new(
            path,
            FileFormat::Property,
            loader,
        ))
        .unwrap()
        .parse()
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.service_name, "billing");
        assert_eq!(config.db.host, "db.internal");
        assert_eq!(config.db.port, 6432);
    }

    #[test]
    fn all_field_errors_collected_in_order() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "app.yaml",
            "port: \"${PORT}\"\nservice-name: api\ndb:\n  host: \"${DB_HOST}\"\n  port: \"five\"\n",
        );
        let parser = ConfigFileParser::<Service>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap();

        let err = parser.parse().unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["Port: ${PORT}", "Host: ${DB_HOST}", "Port: five"]);
        assert_eq!(
            err.field_errors()[0].message,
            "environment variable 'PORT' is not set"
        );
        assert!(err.to_string().starts_with("found 3 error(s)"));
    }

    #[test]
    fn integer_out_of_width_is_field_error() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", &service_yaml("3000000000"));
        let err = ConfigFileParser::<Service>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap()
        .parse()
        .unwrap_err();
        assert_eq!(
            err.field_errors(),
            &[FieldError::new(
                "Port: 3000000000",
                "value 3000000000 is out of range for i32"
            )]
        );
    }
}

mod scalar_text_tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Release {
        version: String,
        ratio: String,
        big: String,
    }

    impl ConfigSchema for Release {
        fn schema() -> Schema {
            Schema::new("Release")
                .field(Field::string("Version").key("version"))
                .field(Field::string("Ratio").key("ratio"))
                .field(Field::string("Big").key("big"))
        }
    }

    fn parse(name: &str, content: &str, format: FileFormat) -> Result<Release, ConfigError> {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, name, content);
        ConfigFileParser::<Release>::loose(FileConfiguration::new(path, format, no_vars()))
            .unwrap()
            .parse()
    }

    #[test]
    fn yaml_string_leaves_keep_file_text() {
        let config = parse(
            "app.yaml",
            "version: 1.10\nratio: .inf\nbig: 0x1F\n",
            FileFormat::Yaml,
        )
        .unwrap();
        assert_eq!(
            config,
            Release {
                version: "1.10".into(),
                ratio: ".inf".into(),
                big: "0x1F".into(),
            }
        );
    }

    #[test]
    fn yaml_integer_wider_than_u64_is_text() {
        let config = parse(
            "app.yaml",
            "version: '1'\nratio: x\nbig: 123456789012345678901234567890\n",
            FileFormat::Yaml,
        )
        .unwrap();
        assert_eq!(config.big, "123456789012345678901234567890");
    }

    #[test]
    fn property_string_leaves_keep_file_text() {
        let config = parse(
            "app.properties",
            "version = 1.10\nratio = inf\nbig = 0x1F\n",
            FileFormat::Property,
        )
        .unwrap();
        assert_eq!(config.version, "1.10");
        assert_eq!(config.ratio, "inf");
        assert_eq!(config.big, "0x1F");
    }
}

mod in_place_tests {
    use super::*;

    #[test]
    fn resolves_all_string_record() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "endpoints.yaml",
            "public: \"https://${DOMAIN}\"\ninternal: http://localhost:9000\n",
        );
        let loader = BraceEnvironmentLoader::with_vars([("DOMAIN", "example.org")]);
        let config = ConfigFileParser::<Endpoints>::in_place(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            loader,
        ))
        .unwrap()
        .parse()
        .unwrap();
        assert_eq!(
            config,
            Endpoints {
                public: "https://example.org".into(),
                internal: "http://localhost:9000".into(),
            }
        );
    }

    #[test]
    fn typed_record_rejected_at_construction() {
        let err = ConfigFileParser::<Service>::in_place(FileConfiguration::yaml("missing.yaml"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Schema(SchemaError::NonStringLeaf { .. })
        ));
    }

    #[test]
    fn in_place_and_loose_agree_on_errors() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "endpoints.yaml", "public: \"${NOPE}\"\n");

        let in_place = ConfigFileParser::<Endpoints>::in_place(FileConfiguration::new(
            path.clone(),
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap()
        .parse()
        .unwrap_err();
        let loose = ConfigFileParser::<Endpoints>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap()
        .parse()
        .unwrap_err();

        assert_eq!(in_place.field_errors(), loose.field_errors());
        assert_eq!(in_place.field_errors().len(), 2);
    }
}

mod strict_tests {
    use super::*;

    #[test]
    fn strict_yaml_coerces_into_typed_record() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", &service_yaml("5432"));
        let config = ConfigFileParser::<Service>::strict::<RawService>(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap()
        .parse()
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.db.port, 5432);
    }

    #[test]
    fn strict_errors_name_loose_fields() {
        struct Renamed;

        impl ConfigSchema for Renamed {
            fn schema() -> Schema {
                Schema::new("Renamed")
                    .field(Field::string("ListenPort").key("port"))
                    .field(Field::string("Name").key("service-name"))
                    .field(
                        Field::nested(
                            "Database",
                            Schema::new("RenamedDb")
                                .field(Field::string("Address").key("host"))
                                .field(Field::string("DbPort").key("port")),
                        )
                        .key("db"),
                    )
            }
        }

        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", &service_yaml("x"));
        let err = ConfigFileParser::<Service>::strict::<Renamed>(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            no_vars(),
        ))
        .unwrap()
        .parse()
        .unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "DbPort: x");
    }

    #[test]
    fn mismatched_shapes_rejected_before_io() {
        struct TooShort;

        impl ConfigSchema for TooShort {
            fn schema() -> Schema {
                Schema::new("TooShort").field(Field::string("Port"))
            }
        }

        let err = ConfigFileParser::<Service>::strict::<TooShort>(FileConfiguration::yaml(
            "/nonexistent/app.yaml",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Schema(SchemaError::FieldCountMismatch { .. })
        ));
    }

    #[test]
    fn unsupported_strict_leaf_rejected() {
        struct WithRatio;

        impl ConfigSchema for WithRatio {
            fn schema() -> Schema {
                Schema::new("WithRatio").field(Field::float("Ratio"))
            }
        }

        struct RawRatio;

        impl ConfigSchema for RawRatio {
            fn schema() -> Schema {
                Schema::new("RawRatio").field(Field::string("Ratio"))
            }
        }

        let err = ConfigFileParser::<serde_json::Value>::new(
            FileConfiguration::yaml("app.yaml"),
            ShapePlan::Strict {
                loose: RawRatio::schema(),
                strict: WithRatio::schema(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Schema(SchemaError::UnsupportedLeaf { kind: "float", .. })
        ));
    }

    #[test]
    fn strict_property_convenience_constructor() {
        let parser = ConfigFileParser::<Service>::strict_property::<RawService>("app.properties")
            .unwrap();
        assert_eq!(parser.file().format(), FileFormat::Property);
        assert_eq!(parser.plan().mode(), "strict");
    }
}

mod file_level_tests {
    use super::*;

    #[test]
    fn missing_file_fails_before_any_field() {
        let temp = TempDir::new().unwrap();
        let parser = ConfigFileParser::<Service, _>::loose(FileConfiguration::new(
            temp.path().join("absent.yaml"),
            FileFormat::Yaml,
            CountingLoader::default(),
        ))
        .unwrap();

        let err = parser.parse().unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.field_errors().is_empty());
        assert_eq!(parser.file().loader().calls.get(), 0);
    }

    #[test]
    fn json_is_not_implemented_regardless_of_content() {
        let temp = TempDir::new().unwrap();
        for content in ["{\"port\": \"8080\"}", "not json at all"] {
            let path = write(&temp, "app.json", content);
            let err = ConfigFileParser::<Service, _>::loose(FileConfiguration::new(
                path,
                FileFormat::Json,
                CountingLoader::default(),
            ))
            .unwrap()
            .parse()
            .unwrap_err();
            assert!(matches!(err, ConfigError::NotImplemented(FileFormat::Json)));
            assert_eq!(err.to_string(), "JSON parser not implemented yet");
        }
    }

    #[test]
    fn malformed_file_never_reaches_reconciliation() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", "port: [unclosed\n");
        let parser = ConfigFileParser::<Service, _>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            CountingLoader::default(),
        ))
        .unwrap();

        assert!(matches!(
            parser.parse().unwrap_err(),
            ConfigError::Deserialize { .. }
        ));
        assert_eq!(parser.file().loader().calls.get(), 0);
    }

    #[test]
    fn table_where_leaf_declared_is_deserialize_error() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", "port:\n  value: 1\n");
        let err = ConfigFileParser::<Service, _>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            CountingLoader::default(),
        ))
        .unwrap()
        .parse()
        .unwrap_err();
        let ConfigError::Deserialize { message, .. } = err else {
            panic!("expected a deserialize error");
        };
        assert!(message.contains("expected a scalar value at 'port'"), "{message}");
    }

    #[test]
    fn every_leaf_visited_once() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.yaml", &service_yaml("5432"));
        let parser = ConfigFileParser::<Service, _>::loose(FileConfiguration::new(
            path,
            FileFormat::Yaml,
            CountingLoader::default(),
        ))
        .unwrap();
        parser.parse().unwrap();
        assert_eq!(parser.file().loader().calls.get(), 4);
    }

    #[test]
    fn format_inferred_from_extension() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "app.toml",
            "public = \"https://example.org\"\ninternal = \"http://localhost\"\n",
        );
        let file = FileConfiguration::from_path(path).unwrap();
        assert_eq!(file.format(), FileFormat::Property);
        let config = ConfigFileParser::<Endpoints>::in_place(file)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(config.internal, "http://localhost");
    }
}
