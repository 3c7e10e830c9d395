//! Traversal tests using hand-written schema implementations.

use std::time::Duration;

use rstest::rstest;

use super::{Flow, Member, Schema, Slot, descriptors, find_field, walk};
use crate::error::ConfigError;
use crate::types::TypeKey;

#[derive(Default)]
struct Limits {
    max_conns: u32,
    idle: Option<Duration>,
}

impl Schema for Limits {
    fn members(&mut self) -> Vec<Member<'_>> {
        vec![
            Member::leaf(
                "MaxConns",
                r#"desc:"Connection cap" default:"10""#,
                Slot::new(&mut self.max_conns),
            ),
            Member::leaf("Idle", "", Slot::optional(&mut self.idle)),
        ]
    }
}

#[derive(Default)]
struct Common {
    verbose: bool,
}

impl Schema for Common {
    fn members(&mut self) -> Vec<Member<'_>> {
        vec![Member::leaf("verbose", r#"short:"v""#, Slot::new(&mut self.verbose))]
    }
}

#[derive(Default)]
struct Root {
    common: Common,
    host: String,
    db: Limits,
    flat: Limits,
    renamed: Limits,
    scratch: String,
}

impl Schema for Root {
    fn members(&mut self) -> Vec<Member<'_>> {
        vec![
            Member::embedded("common", "", &mut self.common),
            Member::leaf("host", r#"enum:"a,b""#, Slot::new(&mut self.host)),
            Member::nested("db", "", &mut self.db),
            Member::nested("flat", r#"name:"""#, &mut self.flat),
            Member::nested("renamed", r#"name:"Pool""#, &mut self.renamed),
            Member::leaf("scratch", r#"ignore:"""#, Slot::new(&mut self.scratch)),
        ]
    }

    fn substructures(&self) -> Vec<&dyn Schema> {
        vec![
            &self.common as &dyn Schema,
            &self.db as &dyn Schema,
            &self.flat as &dyn Schema,
            &self.renamed as &dyn Schema,
        ]
    }
}

#[test]
fn walks_in_declaration_order_with_prefixes() {
    let mut root = Root::default();
    let names: Vec<String> = descriptors(&mut root)
        .expect("walk should succeed")
        .into_iter()
        .map(|field| field.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "verbose",
            "host",
            "db_max_conns",
            "db_idle",
            "max_conns",
            "idle",
            "pool_max_conns",
            "pool_idle",
        ]
    );
}

#[test]
fn descriptors_carry_tag_metadata() {
    let mut root = Root::default();
    let field = find_field(&mut root, "db_max_conns")
        .expect("walk should succeed")
        .expect("field should exist");
    assert_eq!(field.description, "Connection cap");
    assert_eq!(field.default.as_deref(), Some("10"));
    assert_eq!(field.ancestors, vec!["db"]);
    assert_eq!(field.leaf_key(), "max_conns");
    assert_eq!(field.type_key, TypeKey::of::<u32>());

    let idle = find_field(&mut root, "pool_idle")
        .expect("walk should succeed")
        .expect("field should exist");
    assert!(idle.optional);
    assert_eq!(idle.type_key, TypeKey::of::<Duration>());
    assert_eq!(idle.description, "pool idle");

    let host = find_field(&mut root, "host")
        .expect("walk should succeed")
        .expect("field should exist");
    assert_eq!(host.choices, vec!["a", "b"]);
    assert_eq!(host.usage(), "host (a|b)");
}

#[test]
fn stop_ends_the_walk() {
    let mut root = Root::default();
    let mut seen = 0;
    let flow = walk(&mut root, &mut |_, _| {
        seen += 1;
        Ok(if seen == 2 { Flow::Stop } else { Flow::Continue })
    })
    .expect("walk should succeed");
    assert_eq!(flow, Flow::Stop);
    assert_eq!(seen, 2);
}

#[test]
fn slots_write_through_to_fields() {
    let mut root = Root::default();
    walk(&mut root, &mut |field, slot| {
        if field.name == "db_idle" {
            slot.assign(Box::new(Duration::from_secs(3)))
                .map_err(|_| ConfigError::TypeMismatch {
                    name: field.name.clone(),
                    expected: field.type_key.name(),
                })?;
        }
        Ok(Flow::Continue)
    })
    .expect("walk should succeed");
    assert_eq!(root.db.idle, Some(Duration::from_secs(3)));
}

#[test]
fn mismatched_assignment_is_rejected() {
    let mut value = 0_u8;
    let mut slot = Slot::new(&mut value);
    assert!(slot.assign(Box::new("text")).is_err());
}

struct BadTags {
    tags: &'static str,
    value: u8,
}

impl Schema for BadTags {
    fn members(&mut self) -> Vec<Member<'_>> {
        vec![Member::leaf("value", self.tags, Slot::new(&mut self.value))]
    }
}

#[rstest]
#[case(r#"desc:"unterminated"#)]
#[case(r#"short:"ab""#)]
#[case(r#"desc:"a" desc:"b""#)]
fn malformed_tags_are_authoring_errors(#[case] tags: &'static str) {
    let mut schema = BadTags { tags, value: 0 };
    let err = descriptors(&mut schema).expect_err("tags should be rejected");
    assert!(matches!(err, ConfigError::MalformedTag { .. }), "{err:?}");
    assert!(err.is_authoring_error());
}
