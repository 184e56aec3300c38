//! Binds `demos/app.yaml` onto a typed record, coercing through the record's own schema.
//!
//! Run with `PORT=8080 DB_HOST=localhost cargo run --example yaml`.

use anyhow::Result;
use confbind::logging::{self, LogTarget};
use confbind::{ConfigFileParser, ConfigSchema, Field, IntWidth, Schema};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Db {
    host: String,
    port: u16,
}

impl ConfigSchema for Db {
    fn schema() -> Schema {
        Schema::new("Db")
            .field(Field::string("Host").key("host"))
            .field(Field::int_width("Port", IntWidth::U16).key("port"))
    }
}

#[derive(Debug, Deserialize)]
struct YamlServiceConfiguration {
    port: u16,
    #[serde(rename = "service-name")]
    service_name: String,
    db: Db,
}

impl ConfigSchema for YamlServiceConfiguration {
    fn schema() -> Schema {
        Schema::new("YamlServiceConfiguration")
            .field(Field::int_width("Port", IntWidth::U16).key("port"))
            .field(Field::string("ServiceName").key("service-name"))
            .field(Field::nested("DB", Db::schema()).key("db"))
    }
}

fn main() -> Result<()> {
    logging::init(&LogTarget::Stderr, false)?;

    let parser = ConfigFileParser::<YamlServiceConfiguration>::yaml("demos/app.yaml")?;
    match parser.parse() {
        Ok(config) => println!("{config:#?}"),
        Err(err) => println!("{err}"),
    }
    Ok(())
}
