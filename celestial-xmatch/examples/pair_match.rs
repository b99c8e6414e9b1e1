//! Match a handful of observed positions against a small reference list.
//!
//! Run with `cargo run -p celestial-xmatch --example pair_match`.

use celestial_core::SkyPoint;
use celestial_xmatch::{match_all, CoordinateIndex, MatchMode, XMatchResult};

fn main() -> XMatchResult<()> {
    let reference = [
        SkyPoint::new(83.8221, -5.3911)?,
        SkyPoint::new(88.7929, 7.4071)?,
        SkyPoint::new(101.2872, -16.7161)?,
    ];
    let observed = [
        SkyPoint::new(83.8223, -5.3910)?,
        SkyPoint::new(101.2870, -16.7165)?,
        SkyPoint::new(279.2347, 38.7837)?,
    ];

    let index = CoordinateIndex::build(&reference)?;
    for record in match_all(&observed, &index, MatchMode::Nearest, None)? {
        println!(
            "{} -> {} at {:.3}\"",
            observed[record.source_index], reference[record.target_index], record.separation_arcsec
        );
    }

    let within = match_all(&observed, &index, MatchMode::Radius, Some(5.0))?;
    println!("{} pairs within 5\"", within.len());
    Ok(())
}
