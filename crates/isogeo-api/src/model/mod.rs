// ── Entity records and their schema tables ──
//
// Every entity is a plain struct of optional fields. The wire contract lives
// in three tables on the `Entity` trait (full schema, creation subset,
// read→write name map) and is enforced by the generic serializers below,
// so no model carries its own serialization code.

mod condition;
mod contact;
mod license;
mod metadata;
mod share;
mod specification;
mod workgroup;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

pub use condition::Condition;
pub use contact::Contact;
pub use license::License;
pub use metadata::Metadata;
pub use share::Share;
pub use specification::Specification;
pub use workgroup::Workgroup;

/// Plain JSON mapping, the "dict form" of an entity.
pub type Dict = serde_json::Map<String, Value>;

// ── Schema tables ───────────────────────────────────────────────────

/// Semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Ordered sequence (of scalars, mappings or entities).
    List,
    /// Nested typed entity.
    Entity,
    /// Free-form mapping.
    Mapping,
}

/// One entry of an entity's full schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name in the read (GET) representation.
    pub name: &'static str,
    pub kind: FieldKind,
}

pub(crate) const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// A typed record of the Isogeo API.
pub trait Entity: Serialize + DeserializeOwned + Default + Clone {
    /// Human name of the entity family, used in messages.
    const KIND: &'static str;

    /// Every field the API may return.
    const FIELDS: &'static [Field];

    /// Read names of the fields accepted on create and update.
    const CREATION: &'static [&'static str];

    /// `(read name, write name)` pairs for fields renamed on create/update.
    const WRITE_NAMES: &'static [(&'static str, &'static str)] = &[];

    /// Server-assigned identifier, if the entity has been persisted.
    fn id(&self) -> Option<&str>;

    /// Display name indexed by the session's name→id cache.
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Local checks run before a create call.
    fn validate_creation(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// Write (POST/PUT) name of a field.
pub fn write_name<E: Entity>(read_name: &'static str) -> &'static str {
    E::WRITE_NAMES
        .iter()
        .find(|(read, _)| *read == read_name)
        .map_or(read_name, |(_, write)| *write)
}

// ── Generic serializers ─────────────────────────────────────────────

/// The full dict form: every schema field, unset ones as `null`,
/// nested entities lowered to their own dict form.
pub fn to_dict<E: Entity>(entity: &E) -> Result<Dict, Error> {
    let mut lowered = lower(entity)?;
    Ok(E::FIELDS
        .iter()
        .map(|f| (f.name.to_owned(), lowered.remove(f.name).unwrap_or(Value::Null)))
        .collect())
}

/// The creation dict form: only creation fields, under their write names.
pub fn to_dict_creation<E: Entity>(entity: &E) -> Result<Dict, Error> {
    let mut lowered = lower(entity)?;
    Ok(E::CREATION
        .iter()
        .map(|name| {
            let value = lowered.remove(*name).unwrap_or(Value::Null);
            (write_name::<E>(name).to_owned(), value)
        })
        .collect())
}

/// Build a typed entity from a dict (e.g. one item of a list response).
pub fn from_dict<E: Entity>(dict: Dict) -> Result<E, Error> {
    let value = Value::Object(dict);
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: format!("{} from dict: {e}", E::KIND),
        body: value.to_string(),
    })
}

/// Follow `path` through nested mappings and return the string found there.
pub fn name_at<'a>(dict: &'a Dict, path: &[&str]) -> Option<&'a str> {
    let (last, parents) = path.split_last()?;
    let mut current = dict;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)?.as_str()
}

fn lower<E: Serialize>(entity: &E) -> Result<Dict, Error> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Serialization(<serde_json::Error as serde::ser::Error>::custom(
            format!("entity lowered to a non-object value: {other}"),
        ))),
    }
}
