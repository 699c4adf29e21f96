use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::geometry::{GroundStation, PassWindow};
use crate::sampler::SampleRecord;

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const RULE: &str =
    "-----------------------------------------------------------------------------------";

fn local<Tz: TimeZone>(t: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    t.with_timezone(tz).format(TIME_FORMAT).to_string()
}

pub fn pass_header<Tz: TimeZone>(
    satellite: &str,
    station: &GroundStation,
    window: &PassWindow,
    tz: &Tz,
) -> String
where
    Tz::Offset: Display,
{
    [
        format!(
            "Next pass of {} for: {:.4} {:.4}",
            satellite, station.latitude_deg, station.longitude_deg
        ),
        format!("    Rise time : {}", local(window.rise, tz)),
        format!("           Az : {:6.2}", window.rise_azimuth_deg),
        format!(" Transit Time : {}", local(window.transit, tz)),
        format!("          Alt : {:6.2}", window.transit_altitude_deg),
        format!("     Set Time : {}", local(window.set, tz)),
        format!("           Az : {:6.2}", window.set_azimuth_deg),
        format!("     Duration : {}s", window.duration_seconds()),
    ]
    .join("\n")
}

pub fn table_header() -> String {
    format!(
        "{}\n| TIME                |   Alt  |     Az      | Range(km) |  Mag   | Sun Alt |\n{}",
        RULE, RULE
    )
}

pub fn table_footer() -> &'static str {
    RULE
}

pub fn table_row<Tz: TimeZone>(record: &SampleRecord, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    format!(
        "| {} | {:6.2} | {:6.2} {:<4} | {:6.0}    | {:>6} | {:6.2}  | {}",
        local(record.timestamp, tz),
        record.altitude_deg,
        record.azimuth_deg,
        record.direction.to_string(),
        record.range_km,
        record.magnitude.to_string(),
        record.sun_altitude_deg,
        if record.eclipsed { "eclipsed" } else { "" }
    )
    .trim_end()
    .to_string()
}

pub fn json_line(record: &SampleRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}
