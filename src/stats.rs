//! Typed views over the per-column statistics messages.
//!
//! Accessors for absent fields fail with `StatsUndefined` instead of
//! inventing defaults.

use crate::error::{OrcError, Result};
use crate::proto;
use crate::schema::{Type, TypeKind};

fn undefined(field: &str) -> OrcError {
    OrcError::StatsUndefined {
        field: field.to_owned(),
    }
}

/// Statistics of one column, shaped by the column's kind.
#[derive(Debug, Clone)]
pub enum ColumnStatistics {
    Integer(IntegerColumnStatistics),
    Double(DoubleColumnStatistics),
    String(StringColumnStatistics),
    Boolean(BooleanColumnStatistics),
    Date(DateColumnStatistics),
    Decimal(DecimalColumnStatistics),
    Timestamp(TimestampColumnStatistics),
    Binary(BinaryColumnStatistics),
    /// Nested kinds only carry a value count.
    Generic(GenericColumnStatistics),
}

impl ColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        match self {
            ColumnStatistics::Integer(stats) => stats.number_of_values,
            ColumnStatistics::Double(stats) => stats.number_of_values,
            ColumnStatistics::String(stats) => stats.number_of_values,
            ColumnStatistics::Boolean(stats) => stats.number_of_values,
            ColumnStatistics::Date(stats) => stats.number_of_values,
            ColumnStatistics::Decimal(stats) => stats.number_of_values,
            ColumnStatistics::Timestamp(stats) => stats.number_of_values,
            ColumnStatistics::Binary(stats) => stats.number_of_values,
            ColumnStatistics::Generic(stats) => stats.number_of_values,
        }
    }

    /// Shape the raw message by the kind of `column`.
    pub(crate) fn from_proto(
        column: &Type,
        stats: &proto::ColumnStatistics,
    ) -> ColumnStatistics {
        let number_of_values = stats.number_of_values.unwrap_or(0);
        match column.kind() {
            TypeKind::Byte | TypeKind::Short | TypeKind::Int | TypeKind::Long => {
                let detail = stats.int_statistics.as_ref();
                ColumnStatistics::Integer(IntegerColumnStatistics {
                    number_of_values,
                    minimum: detail.and_then(|d| d.minimum),
                    maximum: detail.and_then(|d| d.maximum),
                    sum: detail.and_then(|d| d.sum),
                })
            }
            TypeKind::Float | TypeKind::Double => {
                let detail = stats.double_statistics.as_ref();
                ColumnStatistics::Double(DoubleColumnStatistics {
                    number_of_values,
                    minimum: detail.and_then(|d| d.minimum),
                    maximum: detail.and_then(|d| d.maximum),
                    sum: detail.and_then(|d| d.sum),
                })
            }
            TypeKind::String | TypeKind::Varchar | TypeKind::Char => {
                let detail = stats.string_statistics.as_ref();
                ColumnStatistics::String(StringColumnStatistics {
                    number_of_values,
                    minimum: detail.and_then(|d| d.minimum.clone()),
                    maximum: detail.and_then(|d| d.maximum.clone()),
                    total_length: detail.and_then(|d| d.sum).map(|sum| sum as u64),
                })
            }
            TypeKind::Boolean => {
                let detail = stats.bucket_statistics.as_ref();
                ColumnStatistics::Boolean(BooleanColumnStatistics {
                    number_of_values,
                    true_count: detail.and_then(|d| d.count.first().copied()),
                })
            }
            TypeKind::Date => {
                let detail = stats.date_statistics.as_ref();
                ColumnStatistics::Date(DateColumnStatistics {
                    number_of_values,
                    minimum: detail.and_then(|d| d.minimum),
                    maximum: detail.and_then(|d| d.maximum),
                })
            }
            TypeKind::Decimal => {
                let detail = stats.decimal_statistics.as_ref();
                ColumnStatistics::Decimal(DecimalColumnStatistics {
                    number_of_values,
                    minimum: detail.and_then(|d| d.minimum.clone()),
                    maximum: detail.and_then(|d| d.maximum.clone()),
                    sum: detail.and_then(|d| d.sum.clone()),
                })
            }
            TypeKind::Timestamp => {
                let detail = stats.timestamp_statistics.as_ref();
                ColumnStatistics::Timestamp(TimestampColumnStatistics {
                    number_of_values,
                    minimum: detail.and_then(|d| d.minimum),
                    maximum: detail.and_then(|d| d.maximum),
                })
            }
            TypeKind::Binary => {
                let detail = stats.binary_statistics.as_ref();
                ColumnStatistics::Binary(BinaryColumnStatistics {
                    number_of_values,
                    total_length: detail.and_then(|d| d.sum).map(|sum| sum as u64),
                })
            }
            TypeKind::Struct | TypeKind::List | TypeKind::Map | TypeKind::Union => {
                ColumnStatistics::Generic(GenericColumnStatistics { number_of_values })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegerColumnStatistics {
    number_of_values: u64,
    minimum: Option<i64>,
    maximum: Option<i64>,
    sum: Option<i64>,
}

impl IntegerColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_minimum(&self) -> bool {
        self.minimum.is_some()
    }

    pub fn has_maximum(&self) -> bool {
        self.maximum.is_some()
    }

    pub fn has_sum(&self) -> bool {
        self.sum.is_some()
    }

    pub fn minimum(&self) -> Result<i64> {
        self.minimum.ok_or_else(|| undefined("minimum"))
    }

    pub fn maximum(&self) -> Result<i64> {
        self.maximum.ok_or_else(|| undefined("maximum"))
    }

    pub fn sum(&self) -> Result<i64> {
        self.sum.ok_or_else(|| undefined("sum"))
    }
}

#[derive(Debug, Clone)]
pub struct DoubleColumnStatistics {
    number_of_values: u64,
    minimum: Option<f64>,
    maximum: Option<f64>,
    sum: Option<f64>,
}

impl DoubleColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_minimum(&self) -> bool {
        self.minimum.is_some()
    }

    pub fn has_maximum(&self) -> bool {
        self.maximum.is_some()
    }

    pub fn has_sum(&self) -> bool {
        self.sum.is_some()
    }

    pub fn minimum(&self) -> Result<f64> {
        self.minimum.ok_or_else(|| undefined("minimum"))
    }

    pub fn maximum(&self) -> Result<f64> {
        self.maximum.ok_or_else(|| undefined("maximum"))
    }

    pub fn sum(&self) -> Result<f64> {
        self.sum.ok_or_else(|| undefined("sum"))
    }
}

#[derive(Debug, Clone)]
pub struct StringColumnStatistics {
    number_of_values: u64,
    minimum: Option<String>,
    maximum: Option<String>,
    total_length: Option<u64>,
}

impl StringColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_minimum(&self) -> bool {
        self.minimum.is_some()
    }

    pub fn has_maximum(&self) -> bool {
        self.maximum.is_some()
    }

    pub fn has_total_length(&self) -> bool {
        self.total_length.is_some()
    }

    pub fn minimum(&self) -> Result<&str> {
        self.minimum.as_deref().ok_or_else(|| undefined("minimum"))
    }

    pub fn maximum(&self) -> Result<&str> {
        self.maximum.as_deref().ok_or_else(|| undefined("maximum"))
    }

    pub fn total_length(&self) -> Result<u64> {
        self.total_length.ok_or_else(|| undefined("total length"))
    }
}

#[derive(Debug, Clone)]
pub struct BooleanColumnStatistics {
    number_of_values: u64,
    true_count: Option<u64>,
}

impl BooleanColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_count(&self) -> bool {
        self.true_count.is_some()
    }

    pub fn true_count(&self) -> Result<u64> {
        self.true_count.ok_or_else(|| undefined("true count"))
    }

    pub fn false_count(&self) -> Result<u64> {
        self.true_count
            .map(|count| self.number_of_values - count)
            .ok_or_else(|| undefined("false count"))
    }
}

#[derive(Debug, Clone)]
pub struct DateColumnStatistics {
    number_of_values: u64,
    minimum: Option<i32>,
    maximum: Option<i32>,
}

impl DateColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_minimum(&self) -> bool {
        self.minimum.is_some()
    }

    pub fn has_maximum(&self) -> bool {
        self.maximum.is_some()
    }

    pub fn minimum(&self) -> Result<i32> {
        self.minimum.ok_or_else(|| undefined("minimum"))
    }

    pub fn maximum(&self) -> Result<i32> {
        self.maximum.ok_or_else(|| undefined("maximum"))
    }
}

#[derive(Debug, Clone)]
pub struct DecimalColumnStatistics {
    number_of_values: u64,
    minimum: Option<String>,
    maximum: Option<String>,
    sum: Option<String>,
}

impl DecimalColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_minimum(&self) -> bool {
        self.minimum.is_some()
    }

    pub fn has_maximum(&self) -> bool {
        self.maximum.is_some()
    }

    pub fn has_sum(&self) -> bool {
        self.sum.is_some()
    }

    pub fn minimum(&self) -> Result<&str> {
        self.minimum.as_deref().ok_or_else(|| undefined("minimum"))
    }

    pub fn maximum(&self) -> Result<&str> {
        self.maximum.as_deref().ok_or_else(|| undefined("maximum"))
    }

    pub fn sum(&self) -> Result<&str> {
        self.sum.as_deref().ok_or_else(|| undefined("sum"))
    }
}

#[derive(Debug, Clone)]
pub struct TimestampColumnStatistics {
    number_of_values: u64,
    minimum: Option<i64>,
    maximum: Option<i64>,
}

impl TimestampColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_minimum(&self) -> bool {
        self.minimum.is_some()
    }

    pub fn has_maximum(&self) -> bool {
        self.maximum.is_some()
    }

    pub fn minimum(&self) -> Result<i64> {
        self.minimum.ok_or_else(|| undefined("minimum"))
    }

    pub fn maximum(&self) -> Result<i64> {
        self.maximum.ok_or_else(|| undefined("maximum"))
    }
}

#[derive(Debug, Clone)]
pub struct BinaryColumnStatistics {
    number_of_values: u64,
    total_length: Option<u64>,
}

impl BinaryColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn has_total_length(&self) -> bool {
        self.total_length.is_some()
    }

    pub fn total_length(&self) -> Result<u64> {
        self.total_length.ok_or_else(|| undefined("total length"))
    }
}

#[derive(Debug, Clone)]
pub struct GenericColumnStatistics {
    number_of_values: u64,
}

impl GenericColumnStatistics {
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }
}

/// Per-stripe statistics: one entry per column of the root struct.
#[derive(Debug, Clone)]
pub struct StripeStatistics {
    columns: Vec<ColumnStatistics>,
}

impl StripeStatistics {
    pub(crate) fn new(columns: Vec<ColumnStatistics>) -> StripeStatistics {
        StripeStatistics { columns }
    }

    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Result<&ColumnStatistics> {
        self.columns
            .get(index)
            .ok_or_else(|| OrcError::out_of_range("column index"))
    }

    pub fn columns(&self) -> &[ColumnStatistics] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_stats_expose_present_fields() {
        let message = proto::ColumnStatistics {
            number_of_values: Some(42),
            int_statistics: Some(proto::IntegerStatistics {
                minimum: Some(-3),
                maximum: Some(17),
                sum: None,
            }),
            ..Default::default()
        };
        let column = Type::primitive(TypeKind::Int);
        let stats = ColumnStatistics::from_proto(&column, &message);
        assert_eq!(stats.number_of_values(), 42);
        match stats {
            ColumnStatistics::Integer(stats) => {
                assert_eq!(stats.minimum().unwrap(), -3);
                assert_eq!(stats.maximum().unwrap(), 17);
                assert!(!stats.has_sum());
                assert!(matches!(
                    stats.sum(),
                    Err(OrcError::StatsUndefined { .. })
                ));
            }
            other => panic!("expected integer statistics, got {other:?}"),
        }
    }

    #[test]
    fn boolean_stats_derive_the_false_count() {
        let message = proto::ColumnStatistics {
            number_of_values: Some(10),
            bucket_statistics: Some(proto::BucketStatistics { count: vec![4] }),
            ..Default::default()
        };
        let column = Type::primitive(TypeKind::Boolean);
        match ColumnStatistics::from_proto(&column, &message) {
            ColumnStatistics::Boolean(stats) => {
                assert_eq!(stats.true_count().unwrap(), 4);
                assert_eq!(stats.false_count().unwrap(), 6);
            }
            other => panic!("expected boolean statistics, got {other:?}"),
        }
    }

    #[test]
    fn nested_kinds_keep_only_the_count() {
        let message = proto::ColumnStatistics {
            number_of_values: Some(7),
            ..Default::default()
        };
        let column = Type::struct_type::<&str>(vec![]);
        match ColumnStatistics::from_proto(&column, &message) {
            ColumnStatistics::Generic(stats) => assert_eq!(stats.number_of_values(), 7),
            other => panic!("expected generic statistics, got {other:?}"),
        }
    }
}
