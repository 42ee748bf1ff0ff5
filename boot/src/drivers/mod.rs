//! Драйверы загрузочного сектора / Boot sector drivers
//!
//! Единственный: видеосервис BIOS (int 0x10).
//! Just one: the BIOS video service (int 0x10).

pub mod video;
