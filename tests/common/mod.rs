#![allow(dead_code)]

use std::future::pending;

use phonebook::{ContactsEngine, ContactsServer};
use tokio::net::TcpListener;

/// serves `server` on a random local port, returning its base URL
pub async fn spawn<E: ContactsEngine>(server: ContactsServer<E>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { server.serve(listener, pending()).await.expect("serve app") });
    format!("http://{addr}")
}

/// serves a phonebook over `engine` on a random local port, returning its base URL
pub async fn spawn_engine<E: ContactsEngine>(engine: E) -> String {
    spawn(ContactsServer::new(engine)).await
}
