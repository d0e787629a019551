//! Concrete entity wired by this binary.
//!
//! The pipeline crates are agnostic to any schema; this is the one place a
//! record type is spelled out. The canonical use case is the NYC yellow
//! taxi trip feed.

use chrono::NaiveDateTime;

use rowpipe_model::entity::arity_error;
use rowpipe_model::{Entity, FieldDescriptor, FieldValue, ModelError, SemanticType};

#[derive(Debug, Clone, PartialEq)]
pub struct TaxiTrip {
    pub vendor_id: Option<i64>,
    pub tpep_pickup_datetime: NaiveDateTime,
    pub tpep_dropoff_datetime: NaiveDateTime,
    pub passenger_count: Option<i64>,
    pub trip_distance: f64,
    pub store_and_fwd_flag: Option<String>,
    pub payment_type: Option<String>,
    pub total_amount: f64,
}

impl Entity for TaxiTrip {
    fn field_descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("vendor_id", SemanticType::Integer),
            FieldDescriptor::new("tpep_pickup_datetime", SemanticType::Timestamp),
            FieldDescriptor::new("tpep_dropoff_datetime", SemanticType::Timestamp),
            FieldDescriptor::new("passenger_count", SemanticType::Integer),
            FieldDescriptor::new("trip_distance", SemanticType::Decimal),
            FieldDescriptor::new("store_and_fwd_flag", SemanticType::Text),
            FieldDescriptor::new("payment_type", SemanticType::Text),
            FieldDescriptor::new("total_amount", SemanticType::Decimal),
        ]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "vendor_id" => Some(self.vendor_id.map_or(FieldValue::Null, FieldValue::Integer)),
            "tpep_pickup_datetime" => Some(FieldValue::Timestamp(self.tpep_pickup_datetime)),
            "tpep_dropoff_datetime" => Some(FieldValue::Timestamp(self.tpep_dropoff_datetime)),
            "passenger_count" => Some(
                self.passenger_count
                    .map_or(FieldValue::Null, FieldValue::Integer),
            ),
            "trip_distance" => Some(FieldValue::Decimal(self.trip_distance)),
            "store_and_fwd_flag" => Some(
                self.store_and_fwd_flag
                    .clone()
                    .map_or(FieldValue::Null, FieldValue::Text),
            ),
            "payment_type" => Some(
                self.payment_type
                    .clone()
                    .map_or(FieldValue::Null, FieldValue::Text),
            ),
            "total_amount" => Some(FieldValue::Decimal(self.total_amount)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> rowpipe_model::Result<()> {
        match field {
            "vendor_id" => self.vendor_id = value.into_opt_integer(field)?,
            "tpep_pickup_datetime" => self.tpep_pickup_datetime = value.into_timestamp(field)?,
            "tpep_dropoff_datetime" => self.tpep_dropoff_datetime = value.into_timestamp(field)?,
            "passenger_count" => self.passenger_count = value.into_opt_integer(field)?,
            "trip_distance" => self.trip_distance = value.into_decimal(field)?,
            "store_and_fwd_flag" => self.store_and_fwd_flag = value.into_opt_text(field)?,
            "payment_type" => self.payment_type = value.into_opt_text(field)?,
            "total_amount" => self.total_amount = value.into_decimal(field)?,
            _ => return Err(ModelError::UnknownField(field.to_string())),
        }
        Ok(())
    }

    fn from_values(values: Vec<FieldValue>) -> rowpipe_model::Result<Self> {
        let [
            vendor_id,
            pickup,
            dropoff,
            passenger_count,
            trip_distance,
            store_and_fwd_flag,
            payment_type,
            total_amount,
        ]: [FieldValue; 8] = values.try_into().map_err(|v| arity_error(8, v))?;
        Ok(Self {
            vendor_id: vendor_id.into_opt_integer("vendor_id")?,
            tpep_pickup_datetime: pickup.into_timestamp("tpep_pickup_datetime")?,
            tpep_dropoff_datetime: dropoff.into_timestamp("tpep_dropoff_datetime")?,
            passenger_count: passenger_count.into_opt_integer("passenger_count")?,
            trip_distance: trip_distance.into_decimal("trip_distance")?,
            store_and_fwd_flag: store_and_fwd_flag.into_opt_text("store_and_fwd_flag")?,
            payment_type: payment_type.into_opt_text("payment_type")?,
            total_amount: total_amount.into_decimal("total_amount")?,
        })
    }
}

/// Deduplication key for taxi trips: pickup time, dropoff time, and
/// passenger count identify a logically equivalent record.
pub fn trip_dedup_key(trip: &TaxiTrip) -> String {
    format!(
        "{}-{}-{}",
        trip.tpep_pickup_datetime,
        trip.tpep_dropoff_datetime,
        trip.passenger_count
            .map_or_else(String::new, |count| count.to_string())
    )
}
