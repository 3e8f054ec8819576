// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample(id: u64) -> JobSpec {
    JobSpec {
        id: JobId(id),
        input_directory: PathBuf::from("in"),
        output_directory: PathBuf::from("out"),
        mapper_executable: PathBuf::from("map.sh"),
        reducer_executable: PathBuf::from("reduce.sh"),
        num_mappers: 2,
        num_reducers: 3,
    }
}

#[test]
fn carries_the_requested_stage_widths() {
    let job = sample(0);
    assert_eq!(job.num_mappers, 2);
    assert_eq!(job.num_reducers, 3);
}

#[test]
fn id_round_trips_through_the_struct() {
    let job = sample(41);
    assert_eq!(job.id, JobId(41));
}
