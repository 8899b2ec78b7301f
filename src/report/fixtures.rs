// An input directory for the tests: one RCV office and one measure.

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value as JSValue};

pub fn election_json() -> JSValue {
    json!({
        "languages": ["en"],
        "result_stat_types": [
            {"_id": "RSReg", "heading": {"en": "Registered Voters"}},
            {"_id": "RSCst", "heading": {"en": "Ballots Cast"}},
            {"_id": "RSCnt", "heading": {"en": "Continuing Ballots"}}
        ],
        "voting_groups": [
            {"_id": "EV", "heading": {"en": "Election Day"}},
            {"_id": "MV", "heading": {"en": "Vote by Mail"}}
        ],
        "result_styles": [
            {"_id": "RS", "is_rcv": "N", "voting_group_ids": "EV MV", "result_stat_type_ids": "RSReg RSCst"},
            {"_id": "RSRCV", "is_rcv": "Y", "voting_group_ids": "EV MV", "result_stat_type_ids": "RSCst RSCnt"}
        ],
        "areas": [
            {"_id": "ALL", "name": {"en": "City"}, "reporting_group_ids": "P1 P2"},
            {"_id": "P1", "name": {"en": "Precinct 1"}},
            {"_id": "P2", "name": {"en": "Precinct 2"}}
        ],
        "election": {
            "ballot_title": {"en": "Municipal Election"},
            "election_date": "2018-06-05",
            "headers": [{"_id": "H1", "ballot_title": {"en": "City"}}],
            "contests": [
                {
                    "_id": "C1",
                    "_type": "office",
                    "header_id": "H1",
                    "ballot_title": {"en": "Mayor"},
                    "result_style": "RSRCV",
                    "voting_district": "ALL",
                    "choices": [
                        {"_id": "101", "ballot_title": "ALICE"},
                        {"_id": "102", "ballot_title": "BOB"},
                        {"_id": "103", "ballot_title": "CAROL"}
                    ]
                },
                {
                    "_id": "M1",
                    "_type": "measure",
                    "ballot_title": {"en": "Measure A"},
                    "result_style": "RS",
                    "voting_district": "ALL",
                    "choices": [{"_id": "M1Y"}, {"_id": "M1N"}]
                }
            ]
        }
    })
}

pub fn status_json() -> JSValue {
    json!([
        {"_id": "C1", "rcv_rounds": 2, "total_precincts": 2, "precincts_reporting": 2,
         "reporting_time": "2018-06-06 01:15:00"},
        {"_id": "M1", "rcv_rounds": 0, "total_precincts": 2, "precincts_reporting": 1}
    ])
}

pub const C1_RESULTS: &str = "RGid\tVGid\tRSCst\tRSCnt\t101\t102\t103
RCV2\t\t1000\t950\t500\t450\t
RCV1\t\t1000\t1000\t450\t400\t150
P1\tEV\t300\t300\t150\t100\t50
P1\tMV\t200\t200\t100\t80\t20
P2\tEV\t300\t300\t120\t140\t40
P2\tMV\t200\t200\t80\t80\t40
";

pub const M1_RESULTS: &str = "RGid|VGid|RSReg|RSCst|M1Y|M1N
P1|EV|1000|400|250|150
P1|MV|1000|300|200|100
P2|EV|800|350|200|150
P2|MV|800|500|450|50
";

/// Writes the input files under a fresh directory of the temp dir.
pub fn write_input_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("elrep_{}", name));
    let _ = fs::remove_dir_all(&dir);
    let results_dir = dir.join("resultdata");
    fs::create_dir_all(&results_dir).unwrap();
    fs::write(
        dir.join("election.json"),
        serde_json::to_string_pretty(&election_json()).unwrap(),
    )
    .unwrap();
    fs::write(
        results_dir.join("contest-status.json"),
        serde_json::to_string_pretty(&status_json()).unwrap(),
    )
    .unwrap();
    fs::write(results_dir.join("results-C1.tsv"), C1_RESULTS).unwrap();
    fs::write(results_dir.join("results-M1.tsv"), M1_RESULTS).unwrap();
    dir
}
