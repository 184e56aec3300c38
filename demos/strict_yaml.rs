//! Reads `demos/app.yaml` through an all-string shape, then coerces into a strict record.
//!
//! Run with `PORT=8080 DB_HOST=localhost cargo run --example strict-yaml`.

use anyhow::Result;
use confbind::logging::{self, LogTarget};
use confbind::{ConfigFileParser, ConfigSchema, Field, IntWidth, Schema};
use serde::Deserialize;

/// Shape of the file as written: every leaf is a string.
struct YamlServiceConfiguration;

impl ConfigSchema for YamlServiceConfiguration {
    fn schema() -> Schema {
        Schema::new("YamlServiceConfiguration")
            .field(Field::string("Port").key("port"))
            .field(Field::string("ServiceName").key("service-name"))
            .field(
                Field::nested(
                    "DB",
                    Schema::new("Db")
                        .field(Field::string("Host").key("host"))
                        .field(Field::string("Port").key("port")),
                )
                .key("db"),
            )
    }
}

#[derive(Debug, Deserialize)]
struct StrictDb {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct StrictYamlServiceConfiguration {
    port: u16,
    #[serde(rename = "service-name")]
    service_name: String,
    db: StrictDb,
}

impl ConfigSchema for StrictYamlServiceConfiguration {
    fn schema() -> Schema {
        Schema::new("StrictYamlServiceConfiguration")
            .field(Field::int_width("Port", IntWidth::U16).key("port"))
            .field(Field::string("ServiceName").key("service-name"))
            .field(
                Field::nested(
                    "DB",
                    Schema::new("StrictDb")
                        .field(Field::string("Host").key("host"))
                        .field(Field::int_width("Port", IntWidth::U16).key("port")),
                )
                .key("db"),
            )
    }
}

fn main() -> Result<()> {
    logging::init(&LogTarget::Stderr, false)?;

    let parser = ConfigFileParser::<StrictYamlServiceConfiguration>::strict_yaml::<
        YamlServiceConfiguration,
    >("demos/app.yaml")?;
    match parser.parse() {
        Ok(config) => println!("{config:#?}"),
        Err(err) => println!("{err}"),
    }
    Ok(())
}
