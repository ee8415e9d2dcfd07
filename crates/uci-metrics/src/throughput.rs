use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uci_core::models::procedure::{ProcedureRecord, Shift};

/// Procedure throughput of one shift partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftRate {
    pub shift: Shift,
    pub records: usize,
    pub procedures: u64,
    /// `procedures / records`; 0 when the shift has no records.
    pub per_record: f64,
    /// Counts per procedure code within the shift.
    pub by_code: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftThroughput {
    pub day: ShiftRate,
    pub night: ShiftRate,
}

/// Partition `records` by shift and compute each partition's rate
/// independently.
pub fn shift_throughput(records: &[ProcedureRecord]) -> ShiftThroughput {
    ShiftThroughput {
        day: rate(Shift::Day, records),
        night: rate(Shift::Night, records),
    }
}

fn rate(shift: Shift, records: &[ProcedureRecord]) -> ShiftRate {
    let mut count = 0usize;
    let mut procedures = 0u64;
    let mut by_code: BTreeMap<String, u64> = BTreeMap::new();

    for record in records.iter().filter(|r| r.shift == shift) {
        count += 1;
        procedures += record.total_count();
        for (code, &n) in &record.procedures {
            *by_code.entry(code.clone()).or_default() += u64::from(n);
        }
    }

    let per_record = if count == 0 {
        0.0
    } else {
        procedures as f64 / count as f64
    };

    ShiftRate {
        shift,
        records: count,
        procedures,
        per_record,
        by_code,
    }
}
