//! Basic S-expression serialization and deserialization.
//!
//! Run with: cargo run --example roundtrip

use serde::{Deserialize, Serialize};
use serde_sexpr::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
enum Role {
    Admin,
    Member { since: u16 },
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    role: Role,
    manager: Option<u32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            role: Role::Admin,
            manager: None,
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            role: Role::Member { since: 2019 },
            manager: Some(42),
        },
    ];

    // Fields are written in declaration order, without names
    let text = to_string(&users)?;
    println!("S-expression output:\n{}\n", text);

    let users_back: Vec<User> = from_str(&text)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    Ok(())
}
