// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod generate;
pub mod load;
pub mod run;
pub mod validate;
