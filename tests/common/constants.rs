//! Sample vendor exports used across the test suite.
//!
//! When a vendor layout changes, update only this file.

// ============================================================================
// Triton Webcast Metrics
// ============================================================================

/// Two weeks of one station, split into two dayparts each.
///
/// Week of 2024-01-07: CUME 1000 and 3000, TLH 10 and 15.
/// Week of 2024-01-14: CUME 2000 and 0, TLH 40 and 0.
#[allow(dead_code)]
pub const TRITON_WEEKLY_CSV: &str = "\
Week,Station,Daypart,CUME,TLH,AAS
2024-01-07,WXYZ,Morning Drive,1000,10,4
2024-01-09,WXYZ,Afternoon,3000,15,6
2024-01-14,WXYZ,Morning Drive,2000,40,8
2024-01-16,WXYZ,Afternoon,0,0,0
";

/// Ten rows where rows 4 and 8 are broken.
#[allow(dead_code)]
pub const TRITON_WITH_BAD_ROWS_CSV: &str = "\
Week,Station,CUME,TLH
2024-01-07,WXYZ,100,200
2024-01-07,WABC,110,220
2024-01-07,WNYC,120,240
2024-01-07,WQXR,,240
2024-01-14,WXYZ,130,260
2024-01-14,WABC,140,280
2024-01-14,WNYC,150,300
2024-01-14,WQXR,160,-5
2024-01-21,WXYZ,170,340
2024-01-21,WABC,180,360
";

// ============================================================================
// Nielsen Audio
// ============================================================================

#[allow(dead_code)]
pub const NIELSEN_CSV: &str = "\
Date,Daypart,AQH Share,AQH Persons,Cume,TSL
2024-02-05,Morning Drive,3.2,1200,5000,2.5
2024-02-06,Midday,2.1,800,4000,1.75
2024-02-07,Evening,1.4,,3000,
";
