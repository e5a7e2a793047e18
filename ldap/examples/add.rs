//! Add one entry
//!
//! ```text
//! cargo run -p ldap --example add -- 127.0.0.1:389
//! ```

use ldap::client::{AddRequest, ConnectionBuilder, LogObserver};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let address = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:389".to_string());

    let conn = ConnectionBuilder::new()
        .tcp(&address)
        .observer(Arc::new(LogObserver))
        .connect()
        .await?;

    println!("-----add----");
    let add = AddRequest::new("cn=test,cn=raft").add("objectClass", ["raftGeneralObject"]);
    match conn.add(&add).await {
        Ok(_) => println!("added {}", add.dn),
        Err(e) => println!("ERROR: {} (result code {})", e, e.result_code()),
    }

    conn.close().await?;
    Ok(())
}
