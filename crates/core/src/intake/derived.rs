//! Derived-field calculator.
//!
//! Each derived field declares its inputs. An edit to an input recomputes
//! only the derived fields that depend on it; nothing outside the declared
//! dependency set is read or written. Recomputing from the same inputs always
//! yields the same values.

use serde_json::{Number, Value};

use super::fields;
use super::record::IntakeRecord;
use super::status::{Environment, Orientation};

/// Address components joined into the full address, in order.
const ADDRESS_PARTS: &[&str] = &[
    fields::ADDRESS_STREET,
    fields::CITY,
    fields::DISTRICT,
    fields::STATE,
    fields::PINCODE,
];

/// Derived fields affected by a change to `key`. Outdoor-only fields list
/// themselves so an edit made while Indoor is nulled again.
pub fn dependents(key: &str) -> &'static [&'static str] {
    match key {
        fields::RESOLUTION_WIDTH | fields::RESOLUTION_HEIGHT => {
            &[fields::ORIENTATION, fields::MAX_UPLOAD_SIZE]
        }
        fields::STANDARD_AD_DURATION_SEC | fields::TOTAL_SLOTS_PER_LOOP => {
            &[fields::LOOP_LENGTH_SEC]
        }
        fields::SCREEN_WIDTH | fields::SCREEN_HEIGHT => &[fields::TOTAL_AREA],
        fields::ADDRESS_STREET
        | fields::CITY
        | fields::DISTRICT
        | fields::STATE
        | fields::PINCODE => &[fields::FULL_ADDRESS],
        fields::ENVIRONMENT => fields::OUTDOOR_ONLY_FIELDS,
        fields::ROAD_TYPE => &[fields::ROAD_TYPE],
        fields::TRAFFIC_DIRECTION => &[fields::TRAFFIC_DIRECTION],
        _ => &[],
    }
}

/// `Landscape` when wider than tall, `Portrait` when taller, `Square` when
/// equal; `None` if either side is unset.
pub fn orientation(record: &IntakeRecord) -> Option<Orientation> {
    let width = record.f64_value(fields::RESOLUTION_WIDTH)?;
    let height = record.f64_value(fields::RESOLUTION_HEIGHT)?;
    Some(if width > height {
        Orientation::Landscape
    } else if width < height {
        Orientation::Portrait
    } else {
        Orientation::Square
    })
}

/// Ad duration times slots per loop, `0` if either is unset.
pub fn loop_length_sec(record: &IntakeRecord) -> f64 {
    match (
        record.f64_value(fields::STANDARD_AD_DURATION_SEC),
        record.f64_value(fields::TOTAL_SLOTS_PER_LOOP),
    ) {
        (Some(duration), Some(slots)) => duration * slots,
        _ => 0.0,
    }
}

/// Physical width times height, `None` if either is unset.
pub fn total_area(record: &IntakeRecord) -> Option<f64> {
    Some(record.f64_value(fields::SCREEN_WIDTH)? * record.f64_value(fields::SCREEN_HEIGHT)?)
}

/// Non-empty address components joined with `", "`.
pub fn full_address(record: &IntakeRecord) -> String {
    ADDRESS_PARTS
        .iter()
        .filter_map(|key| record.str_value(key))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Recompute everything derived from `changed`. Returns the keys written.
pub fn recompute(record: &mut IntakeRecord, changed: &str) -> Vec<&'static str> {
    let targets = dependents(changed);
    for target in targets {
        write_derived(record, target);
    }
    targets.to_vec()
}

/// Recompute every derived field, e.g. after loading a draft.
pub fn recompute_all(record: &mut IntakeRecord) {
    for target in fields::DERIVED_FIELDS {
        write_derived(record, target);
    }
    write_derived(record, fields::ROAD_TYPE);
    write_derived(record, fields::TRAFFIC_DIRECTION);
}

fn write_derived(record: &mut IntakeRecord, target: &str) {
    match target {
        fields::ORIENTATION => match orientation(record) {
            Some(o) => record.set(fields::ORIENTATION, Value::from(o.as_str())),
            None => record.clear(fields::ORIENTATION),
        },
        fields::MAX_UPLOAD_SIZE => match orientation(record).and_then(|o| o.max_upload_size()) {
            Some(size) => record.set(fields::MAX_UPLOAD_SIZE, Value::from(size)),
            None => record.clear(fields::MAX_UPLOAD_SIZE),
        },
        fields::LOOP_LENGTH_SEC => {
            let length = loop_length_sec(record);
            record.set(fields::LOOP_LENGTH_SEC, number(length));
        }
        fields::TOTAL_AREA => match total_area(record) {
            Some(area) => record.set(fields::TOTAL_AREA, number(area)),
            None => record.clear(fields::TOTAL_AREA),
        },
        fields::FULL_ADDRESS => {
            let address = full_address(record);
            record.set(fields::FULL_ADDRESS, Value::from(address));
        }
        // Outdoor-only fields do not apply indoors.
        fields::ROAD_TYPE | fields::TRAFFIC_DIRECTION => {
            if is_indoor(record) {
                record.set(target, Value::Null);
            }
        }
        _ => {}
    }
}

/// `true` when the environment is explicitly Indoor.
pub fn is_indoor(record: &IntakeRecord) -> bool {
    record
        .str_value(fields::ENVIRONMENT)
        .and_then(|s| Environment::from_str_db(s).ok())
        == Some(Environment::Indoor)
}

/// Integral values stay integers on the wire.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}
