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

//! On-disk state: the install tree, the download cache and free-space checks.

pub mod cache;
pub mod disk_probe;
pub mod disk_space;
pub mod installation;

pub use cache::CacheStore;
pub use disk_probe::{SpaceProbe, SysinfoProbe};
pub use disk_space::SpaceGuard;
pub use installation::{InstallLayout, resolve_sdk_root};
