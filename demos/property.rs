//! Binds `demos/app.properties` onto a typed record.
//!
//! Run with `PORT=8080 DB_HOST=localhost cargo run --example property`.

use anyhow::Result;
use confbind::logging::{self, LogTarget};
use confbind::{ConfigFileParser, ConfigSchema, Field, Schema};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PropertyServiceConfiguration {
    port: i64,
    service_name: String,
    db_host: String,
    db_port: i64,
}

impl ConfigSchema for PropertyServiceConfiguration {
    fn schema() -> Schema {
        Schema::new("PropertyServiceConfiguration")
            .field(Field::int("Port"))
            .field(Field::string("ServiceName"))
            .field(Field::string("DbHost"))
            .field(Field::int("DbPort"))
    }
}

fn main() -> Result<()> {
    logging::init(&LogTarget::Stderr, false)?;

    let parser = ConfigFileParser::<PropertyServiceConfiguration>::property("demos/app.properties")?;
    match parser.parse() {
        Ok(config) => println!("{config:#?}"),
        Err(err) => println!("{err}"),
    }
    Ok(())
}
