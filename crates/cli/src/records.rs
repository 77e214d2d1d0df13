//! On-disk formats: recorded measurements, corrected poses, written plans.
//!
//! Measurements come as CSV (read through polars) or as a JSON array of the same
//! flat rows. Poses use position `(x, y, z)` and an `(x, y, z, w)` quaternion.

use anyhow::{anyhow, bail, Context, Result};
use floorplan::{FinishReport, FloorPlan, PlaneMeasurement, PoseParts, PoseStatus, StampedPose};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MEASUREMENT_COLUMNS: [&str; 15] = [
    "timestamp", "plane_px", "plane_py", "plane_pz", "plane_qx", "plane_qy", "plane_qz",
    "plane_qw", "anchor_px", "anchor_py", "anchor_pz", "anchor_qx", "anchor_qy", "anchor_qz",
    "anchor_qw",
];

/// One captured wall, flattened.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRow {
    pub timestamp: f64,
    pub plane_px: f64,
    pub plane_py: f64,
    pub plane_pz: f64,
    pub plane_qx: f64,
    pub plane_qy: f64,
    pub plane_qz: f64,
    pub plane_qw: f64,
    pub anchor_px: f64,
    pub anchor_py: f64,
    pub anchor_pz: f64,
    pub anchor_qx: f64,
    pub anchor_qy: f64,
    pub anchor_qz: f64,
    pub anchor_qw: f64,
}

impl MeasurementRow {
    fn from_values(v: &[f64; 15]) -> Self {
        Self {
            timestamp: v[0],
            plane_px: v[1],
            plane_py: v[2],
            plane_pz: v[3],
            plane_qx: v[4],
            plane_qy: v[5],
            plane_qz: v[6],
            plane_qw: v[7],
            anchor_px: v[8],
            anchor_py: v[9],
            anchor_pz: v[10],
            anchor_qx: v[11],
            anchor_qy: v[12],
            anchor_qz: v[13],
            anchor_qw: v[14],
        }
    }

    #[cfg(test)]
    pub fn from_measurement(m: &PlaneMeasurement) -> Self {
        let p = PoseParts::from(*m.plane_pose());
        let a = PoseParts::from(*m.anchor_pose());
        Self::from_values(&[
            m.capture_timestamp(),
            p.position[0],
            p.position[1],
            p.position[2],
            p.orientation[0],
            p.orientation[1],
            p.orientation[2],
            p.orientation[3],
            a.position[0],
            a.position[1],
            a.position[2],
            a.orientation[0],
            a.orientation[1],
            a.orientation[2],
            a.orientation[3],
        ])
    }

    pub fn to_measurement(&self) -> Result<PlaneMeasurement> {
        let plane = PoseParts {
            position: [self.plane_px, self.plane_py, self.plane_pz],
            orientation: [self.plane_qx, self.plane_qy, self.plane_qz, self.plane_qw],
        }
        .to_transform()
        .ok_or_else(|| anyhow!("bad plane pose at t={}", self.timestamp))?;
        let anchor = PoseParts {
            position: [self.anchor_px, self.anchor_py, self.anchor_pz],
            orientation: [self.anchor_qx, self.anchor_qy, self.anchor_qz, self.anchor_qw],
        }
        .to_transform()
        .ok_or_else(|| anyhow!("bad anchor pose at t={}", self.timestamp))?;
        Ok(PlaneMeasurement::new(plane, anchor, self.timestamp))
    }
}

/// Load measurements in capture order; format picked by extension.
pub fn read_measurements(path: &Path) -> Result<Vec<PlaneMeasurement>> {
    let rows = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_measurement_csv(path)?,
        Some("json") => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice::<Vec<MeasurementRow>>(&bytes)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        _ => bail!("unsupported measurement file {}", path.display()),
    };
    rows.iter().map(MeasurementRow::to_measurement).collect()
}

fn read_measurement_csv(path: &Path) -> Result<Vec<MeasurementRow>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(MEASUREMENT_COLUMNS.len());
    for name in MEASUREMENT_COLUMNS {
        let series = df
            .column(name)
            .with_context(|| format!("missing column {name}"))?
            .cast(&DataType::Float64)?;
        columns.push(series.f64()?.into_iter().collect());
    }
    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut values = [0.0; 15];
        for (v, (col, name)) in values.iter_mut().zip(columns.iter().zip(MEASUREMENT_COLUMNS)) {
            *v = col[i].ok_or_else(|| anyhow!("row {i}: null {name}"))?;
        }
        rows.push(MeasurementRow::from_values(&values));
    }
    Ok(rows)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusRecord {
    Valid,
    Initializing,
    Invalid,
    Unknown,
}

impl From<StatusRecord> for PoseStatus {
    fn from(s: StatusRecord) -> Self {
        match s {
            StatusRecord::Valid => PoseStatus::Valid,
            StatusRecord::Initializing => PoseStatus::Initializing,
            StatusRecord::Invalid => PoseStatus::Invalid,
            StatusRecord::Unknown => PoseStatus::Unknown,
        }
    }
}

fn default_status() -> StatusRecord {
    StatusRecord::Valid
}

/// Corrected device pose in the map frame, as exported after optimization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub timestamp: f64,
    #[serde(default = "default_status")]
    pub status: StatusRecord,
    pub position: [f64; 3],
    pub orientation: [f64; 4],
}

impl PoseRecord {
    pub fn to_stamped(&self) -> Result<StampedPose> {
        let status = PoseStatus::from(self.status);
        if !status.is_valid() {
            return Ok(StampedPose::unavailable(status));
        }
        let parts = PoseParts {
            position: self.position,
            orientation: self.orientation,
        };
        let transform = parts
            .to_transform()
            .ok_or_else(|| anyhow!("bad corrected pose at t={}", self.timestamp))?;
        Ok(StampedPose::valid(transform))
    }
}

pub fn read_poses(path: &Path) -> Result<Vec<PoseRecord>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Written plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub closed: bool,
    pub corners: Vec<[f64; 2]>,
    pub edge_lengths: Vec<f64>,
    pub perimeter: f64,
    pub area: f64,
    pub degenerate_corners: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_measurements: Option<Vec<usize>>,
}

impl PlanRecord {
    pub fn from_plan(plan: &FloorPlan) -> Self {
        Self {
            closed: plan.is_closed(),
            corners: plan.corners().iter().map(|p| [p.x, p.y]).collect(),
            edge_lengths: plan.edge_lengths(),
            perimeter: plan.perimeter(),
            area: plan.area(),
            degenerate_corners: plan.degenerate_corners().to_vec(),
            stale_measurements: None,
        }
    }

    pub fn from_report(report: &FinishReport) -> Self {
        Self {
            stale_measurements: Some(report.stale.clone()),
            ..Self::from_plan(&report.plan)
        }
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}
