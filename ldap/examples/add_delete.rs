//! Add an entry, change it, rename it and delete it again
//!
//! ```text
//! cargo run -p ldap --example add_delete -- 127.0.0.1:389
//! ```

use ldap::client::{AddRequest, ConnectionBuilder, DeleteRequest, ModifyDnRequest, ModifyRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let address = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:389".to_string());
    let conn = ConnectionBuilder::new().tcp(&address).connect().await?;

    println!("--> Add");
    let add = AddRequest::new("commit=21,cn=hardstates,cn=raft")
        .add("commit", ["21"])
        .add("term", ["100"])
        .add("vote", ["100"])
        .add("objectClass", ["raftStateObject"]);
    conn.add(&add).await?;

    println!("--> Modify");
    let modify = ModifyRequest::new("commit=21,cn=hardstates,cn=raft").replace("term", ["101"]);
    conn.modify(&modify).await?;

    println!("--> ModifyDN");
    let rename = ModifyDnRequest::new("commit=21,cn=hardstates,cn=raft", "commit=22", true);
    conn.modify_dn(&rename).await?;

    println!("--> Delete");
    let response = conn
        .delete(&DeleteRequest::new("commit=22,cn=hardstates,cn=raft"))
        .await?;
    println!("deleted ({} response controls)", response.controls.len());

    conn.close().await?;
    Ok(())
}
