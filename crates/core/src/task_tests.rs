// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn map_task_carries_partition_count() {
    let task = Task {
        id: TaskId(0),
        stage: Stage::Map,
        input_paths: vec![PathBuf::from("in/file01")],
        executable: PathBuf::from("/bin/mapper"),
        output_directory: PathBuf::from("/tmp/job-scratch"),
        num_partitions: Some(4),
    };
    assert_eq!(task.num_partitions, Some(4));
    assert_eq!(task.stage, Stage::Map);
}

#[test]
fn reduce_task_has_no_partition_count() {
    let task = Task {
        id: TaskId(0),
        stage: Stage::Reduce,
        input_paths: vec![],
        executable: PathBuf::from("/bin/reducer"),
        output_directory: PathBuf::from("/tmp/out"),
        num_partitions: None,
    };
    assert_eq!(task.num_partitions, None);
    assert_eq!(task.stage, Stage::Reduce);
}
