//! Writing tests - write workbooks to disk and read them back.

mod round_trip;
