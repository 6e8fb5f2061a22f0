//! Avro object-container encoding of records
//!
//! Encoding is guided by our own [`Schema`]: each JSON value is converted
//! according to its field type, and union branches are chosen with the same
//! matcher the validator uses. Decoding uses the writer schema embedded in
//! the container and turns every Avro value into plain JSON.
//!
//! Avro `float` is single precision. Encoding narrows the JSON number to
//! f32 and decoding widens it back, so `0.1` comes back as
//! `0.10000000149011612`. Use `double` for fields that must round-trip
//! exactly. Numbers beyond f32 range are refused rather than saturated.

use std::collections::BTreeMap;

use apache_avro::types::Value as AvroValue;
use apache_avro::{Reader, Writer};
use serde_json::{Number, Value};

use super::errors::{RecordError, RecordResult};
use crate::schema::matcher::{is_null, matches};
use crate::schema::{Primitive, Schema, TypeExpr};
use crate::validation::Datum;

/// Converts a record schema into its apache-avro form.
pub fn avro_schema(schema: &Schema) -> RecordResult<apache_avro::Schema> {
    Ok(apache_avro::Schema::parse(&schema.to_avro_json())?)
}

/// Encodes one record into an Avro object container.
pub fn serialize_record(record: &Datum, schema: &Schema) -> RecordResult<Vec<u8>> {
    serialize_records(std::slice::from_ref(record), schema)
}

/// Encodes records into an Avro object container carrying `schema`.
///
/// Keys the schema does not declare are not written; validate first when
/// that matters.
pub fn serialize_records(records: &[Datum], schema: &Schema) -> RecordResult<Vec<u8>> {
    let avro = avro_schema(schema)?;
    let mut writer = Writer::new(&avro, Vec::new());
    for record in records {
        writer.append(to_avro_record(record, schema)?)?;
    }
    Ok(writer.into_inner()?)
}

/// Decodes every record in an Avro object container.
pub fn deserialize_records(bytes: &[u8]) -> RecordResult<Vec<Datum>> {
    let reader = Reader::new(bytes)?;
    let mut records = Vec::new();
    for value in reader {
        records.push(to_datum(value?)?);
    }
    Ok(records)
}

/// Decodes the first record of an Avro object container, if any.
pub fn deserialize_record(bytes: &[u8]) -> RecordResult<Option<Datum>> {
    Ok(deserialize_records(bytes)?.into_iter().next())
}

fn to_avro_record(record: &Datum, schema: &Schema) -> RecordResult<AvroValue> {
    let mut fields = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let value = record.get(&field.name).or(field.default.as_ref());
        fields.push((field.name.clone(), to_avro(&field.name, &field.type_expr, value)?));
    }
    Ok(AvroValue::Record(fields))
}

fn to_avro(field: &str, type_expr: &TypeExpr, value: Option<&Value>) -> RecordResult<AvroValue> {
    match type_expr {
        TypeExpr::Primitive(p) => primitive_to_avro(field, *p, value),
        TypeExpr::Nullable(inner) => {
            if is_null(value) {
                Ok(AvroValue::Union(0, Box::new(AvroValue::Null)))
            } else {
                Ok(AvroValue::Union(1, Box::new(to_avro(field, inner, value)?)))
            }
        }
        TypeExpr::Array(item) => match value {
            Some(Value::Array(elements)) => elements
                .iter()
                .map(|e| to_avro(field, item, Some(e)))
                .collect::<RecordResult<Vec<_>>>()
                .map(AvroValue::Array),
            _ => Err(RecordError::unencodable(field, "expected an array")),
        },
        TypeExpr::Union(members) => {
            let (idx, member) = members
                .iter()
                .enumerate()
                .find(|(_, m)| matches(m, value))
                .ok_or_else(|| RecordError::unencodable(field, "no union branch matches"))?;
            let branch = u32::try_from(idx)
                .map_err(|_| RecordError::unencodable(field, "union too wide"))?;
            Ok(AvroValue::Union(branch, Box::new(to_avro(field, member, value)?)))
        }
    }
}

fn primitive_to_avro(field: &str, primitive: Primitive, value: Option<&Value>) -> RecordResult<AvroValue> {
    let mismatch = || RecordError::unencodable(field, format!("expected {}", primitive.name()));
    let value = match value {
        None | Some(Value::Null) if primitive == Primitive::Null => return Ok(AvroValue::Null),
        None | Some(Value::Null) => return Err(mismatch()),
        Some(value) => value,
    };

    let avro = match primitive {
        Primitive::Null => return Err(mismatch()),
        Primitive::Boolean => AvroValue::Boolean(value.as_bool().ok_or_else(mismatch)?),
        Primitive::Int => {
            let n = value.as_i64().ok_or_else(mismatch)?;
            AvroValue::Int(i32::try_from(n).map_err(|_| mismatch())?)
        }
        Primitive::Long => AvroValue::Long(value.as_i64().ok_or_else(mismatch)?),
        Primitive::Float => {
            let narrowed = value.as_f64().ok_or_else(mismatch)? as f32;
            if !narrowed.is_finite() {
                return Err(mismatch());
            }
            AvroValue::Float(narrowed)
        }
        Primitive::Double => AvroValue::Double(value.as_f64().ok_or_else(mismatch)?),
        Primitive::String => AvroValue::String(value.as_str().ok_or_else(mismatch)?.to_string()),
    };
    Ok(avro)
}

fn to_datum(value: AvroValue) -> RecordResult<Datum> {
    match value {
        AvroValue::Record(fields) => {
            let mut datum = Datum::new();
            for (name, value) in fields {
                datum.insert(name, to_json(value)?);
            }
            Ok(datum)
        }
        AvroValue::Union(_, inner) => to_datum(*inner),
        other => Err(RecordError::NotARecord(format!("{:?}", other))),
    }
}

fn to_json(value: AvroValue) -> RecordResult<Value> {
    let json = match value {
        AvroValue::Null => Value::Null,
        AvroValue::Boolean(b) => Value::Bool(b),
        AvroValue::Int(i) | AvroValue::Date(i) | AvroValue::TimeMillis(i) => Value::from(i),
        AvroValue::Long(i)
        | AvroValue::TimeMicros(i)
        | AvroValue::TimestampMillis(i)
        | AvroValue::TimestampMicros(i) => Value::from(i),
        AvroValue::Float(f) => float_to_json(f64::from(f))?,
        AvroValue::Double(f) => float_to_json(f)?,
        AvroValue::String(s) | AvroValue::Enum(_, s) => Value::String(s),
        AvroValue::Bytes(bytes) | AvroValue::Fixed(_, bytes) => {
            Value::Array(bytes.into_iter().map(Value::from).collect())
        }
        AvroValue::Uuid(uuid) => Value::String(uuid.to_string()),
        AvroValue::Union(_, inner) => to_json(*inner)?,
        AvroValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<RecordResult<Vec<_>>>()?,
        ),
        AvroValue::Map(entries) => {
            let sorted: BTreeMap<String, AvroValue> = entries.into_iter().collect();
            let mut object = serde_json::Map::new();
            for (key, value) in sorted {
                object.insert(key, to_json(value)?);
            }
            Value::Object(object)
        }
        AvroValue::Record(_) => Value::Object(to_datum(value)?),
        other => return Err(RecordError::Unsupported(format!("{:?}", other))),
    };
    Ok(json)
}

fn float_to_json(f: f64) -> RecordResult<Value> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| RecordError::Unsupported(format!("non-finite float {}", f)))
}
