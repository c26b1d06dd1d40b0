// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Input data model: geometry primitives, node ids, and obstacles.

pub(crate) mod fixtures;
pub mod geometry;
pub mod ids;
pub mod obstacle;

pub use geometry::{Point, Rect, Size};
pub use ids::{EdgeId, Id, IdError, NodeId};
pub use obstacle::Obstacle;
