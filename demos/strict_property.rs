//! Reads `demos/app.properties` through an all-string shape, then coerces into a
//! strict record.
//!
//! Run with `PORT=8080 DB_HOST=localhost cargo run --example strict-property`.

use anyhow::Result;
use confbind::logging::{self, LogTarget};
use confbind::{ConfigFileParser, ConfigSchema, Field, Schema};
use serde::Deserialize;

struct PropertyServiceConfiguration;

impl ConfigSchema for PropertyServiceConfiguration {
    fn schema() -> Schema {
        Schema::new("PropertyServiceConfiguration")
            .field(Field::string("Port"))
            .field(Field::string("ServiceName"))
            .field(Field::string("DbHost"))
            .field(Field::string("DbPort"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StrictPropertyServiceConfiguration {
    port: i64,
    service_name: String,
    db_host: String,
    db_port: i64,
}

impl ConfigSchema for StrictPropertyServiceConfiguration {
    fn schema() -> Schema {
        Schema::new("StrictPropertyServiceConfiguration")
            .field(Field::int("Port"))
            .field(Field::string("ServiceName"))
            .field(Field::string("DbHost"))
            .field(Field::int("DbPort"))
    }
}

fn main() -> Result<()> {
    logging::init(&LogTarget::Stderr, false)?;

    let parser = ConfigFileParser::<StrictPropertyServiceConfiguration>::strict_property::<
        PropertyServiceConfiguration,
    >("demos/app.properties")?;
    match parser.parse() {
        Ok(config) => println!("{config:#?}"),
        Err(err) => println!("{err}"),
    }
    Ok(())
}
