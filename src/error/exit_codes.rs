// Copyright 2025 strigo contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::StrigoError;

pub fn get_exit_code(error: &StrigoError) -> i32 {
    match error.root_cause() {
        StrigoError::ConfigFile(_)
        | StrigoError::InvalidConfig(_)
        | StrigoError::InvalidVersionFilter(_)
        | StrigoError::UnknownSdkType { .. }
        | StrigoError::UnknownDistribution { .. }
        | StrigoError::CertConfigIncomplete(_) => 2,

        StrigoError::NoVersionsFound { .. } | StrigoError::NoMatchingVersion { .. } => 3,

        StrigoError::NotInstalled { .. } => 4,

        StrigoError::RegistryUnreachable { .. }
        | StrigoError::RegistryBadStatus { .. }
        | StrigoError::RegistryMalformedResponse { .. }
        | StrigoError::Download { .. }
        | StrigoError::Http(_) => 20,

        StrigoError::InsufficientSpace { .. } => 28,

        StrigoError::Cancelled(_) => 130,

        _ => 1,
    }
}
