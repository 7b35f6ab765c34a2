//! Structural cache keys.
//!
//! A key is `entity / list|detail / (params|id)`. Params are canonicalized
//! (object keys sorted, nulls dropped) so structurally equal params always land
//! in the same slot and invalidate together.

use std::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Entity {
    Banner,
    Curation,
    TastingTag,
    Alcohol,
    Region,
    Distillery,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyScope {
    All,
    Lists,
    List(String),
    Details,
    Detail(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub entity: Entity,
    pub scope: KeyScope,
}

impl QueryKey {
    pub fn all(entity: Entity) -> Self {
        Self {
            entity,
            scope: KeyScope::All,
        }
    }

    pub fn lists(entity: Entity) -> Self {
        Self {
            entity,
            scope: KeyScope::Lists,
        }
    }

    pub fn list<P: Serialize + ?Sized>(entity: Entity, params: &P) -> Self {
        let value = serde_json::to_value(params).unwrap_or_default();
        Self {
            entity,
            scope: KeyScope::List(canonical_json(&value)),
        }
    }

    pub fn details(entity: Entity) -> Self {
        Self {
            entity,
            scope: KeyScope::Details,
        }
    }

    pub fn detail(entity: Entity, id: i64) -> Self {
        Self {
            entity,
            scope: KeyScope::Detail(id),
        }
    }

    pub fn segments(&self) -> Vec<String> {
        let mut segments = vec![self.entity.to_string()];
        match &self.scope {
            KeyScope::All => {}
            KeyScope::Lists => segments.push("list".into()),
            KeyScope::List(params) => {
                segments.push("list".into());
                segments.push(params.clone());
            }
            KeyScope::Details => segments.push("detail".into()),
            KeyScope::Detail(id) => {
                segments.push("detail".into());
                segments.push(id.to_string());
            }
        }
        segments
    }

    /// True when `prefix`'s segments are a leading run of this key's segments.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        let own = self.segments();
        let prefix = prefix.segments();
        prefix.len() <= own.len() && own.iter().zip(&prefix).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("/"))
    }
}

fn canonical_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &serde_json::Value, out: &mut String) {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().filter(|(_, v)| !v.is_null()).collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use models::models::tasting_tag::TastingTagListParams;
    use serde_json::json;

    use super::*;

    #[test]
    fn structurally_equal_params_share_a_key() {
        let a = QueryKey::list(Entity::Banner, &json!({ "keyword": "봄", "page": 0 }));
        let b = QueryKey::list(Entity::Banner, &json!({ "page": 0, "keyword": "봄", "size": null }));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), r#"banner/list/{"keyword":"봄","page":0}"#);
    }

    #[test]
    fn typed_params_match_untyped_equivalent() {
        let typed = QueryKey::list(
            Entity::TastingTag,
            &TastingTagListParams {
                keyword: Some("바닐라".into()),
                ..Default::default()
            },
        );
        let untyped = QueryKey::list(Entity::TastingTag, &json!({ "keyword": "바닐라" }));
        assert_eq!(typed, untyped);
    }

    #[test]
    fn prefix_matching() {
        let list = QueryKey::list(Entity::Curation, &json!({ "page": 1 }));
        let detail = QueryKey::detail(Entity::Curation, 3);

        assert!(list.starts_with(&QueryKey::lists(Entity::Curation)));
        assert!(list.starts_with(&QueryKey::all(Entity::Curation)));
        assert!(!list.starts_with(&QueryKey::details(Entity::Curation)));
        assert!(detail.starts_with(&QueryKey::details(Entity::Curation)));
        assert!(detail.starts_with(&detail.clone()));
        assert!(!detail.starts_with(&QueryKey::detail(Entity::Curation, 4)));
        assert!(!detail.starts_with(&QueryKey::all(Entity::Banner)));
    }

    #[test]
    fn detail_id_is_not_a_prefix_of_longer_ids() {
        let detail_12 = QueryKey::detail(Entity::Alcohol, 12);
        assert!(!detail_12.starts_with(&QueryKey::detail(Entity::Alcohol, 1)));
    }
}
