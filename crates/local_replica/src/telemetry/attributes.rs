// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

pub(crate) const REPLICA_NAME: &str = "replica.name";

#[cfg(test)]
pub(crate) const REPLICA_EVENT_NAME: &str = "replica.event";

pub(crate) const REPLICA_OPERATION_NAME: &str = "replica.operation";

pub(crate) const REPLICA_ACTIVITY_NAME: &str = "replica.activity";

#[cfg(test)]
pub(crate) const REPLICA_DURATION_NAME: &str = "replica.duration_ns";
