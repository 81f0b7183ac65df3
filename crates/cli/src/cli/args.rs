// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` by the commands that
//! write movie fields.

use clap::Args;
use reel_core::MovieFields;

/// Optional movie fields shared by `add` and `edit`.
#[derive(Args, Clone, Debug, Default)]
pub struct FieldArgs {
    /// Release year
    #[arg(long, short)]
    pub year: Option<i32>,

    /// Plot summary
    #[arg(long)]
    pub overview: Option<String>,

    /// Release date (YYYY-MM-DD)
    #[arg(long)]
    pub release_date: Option<String>,

    /// Runtime in minutes
    #[arg(long)]
    pub runtime: Option<u32>,

    /// Poster image URL
    #[arg(long)]
    pub image: Option<String>,

    /// External link (e.g. a trailer)
    #[arg(long)]
    pub link: Option<String>,
}

impl FieldArgs {
    /// Builds the field set, with `title` when given.
    pub fn into_fields(self, title: Option<String>) -> MovieFields {
        MovieFields {
            title,
            year: self.year,
            overview: self.overview,
            release_date: self.release_date,
            runtime: self.runtime,
            image: self.image,
            link: self.link,
        }
    }
}

/// Connectivity arguments for mutating commands.
#[derive(Args, Clone, Debug, Default)]
pub struct OfflineArgs {
    /// Queue the change locally without contacting the server
    #[arg(long)]
    pub offline: bool,
}
