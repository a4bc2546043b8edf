//! Declarations resolved against the native libsndfile.

use libc::{c_char, c_double, c_float, c_int, c_short, c_void};

use crate::{sf_count_t, SF_INFO, SNDFILE};

extern "C" {
    // Open / close
    pub fn sf_open(path: *const c_char, mode: c_int, sfinfo: *mut SF_INFO) -> *mut SNDFILE;
    pub fn sf_open_fd(
        fd: c_int,
        mode: c_int,
        sfinfo: *mut SF_INFO,
        close_desc: c_int,
    ) -> *mut SNDFILE;
    pub fn sf_close(sndfile: *mut SNDFILE) -> c_int;
    pub fn sf_write_sync(sndfile: *mut SNDFILE);
    pub fn sf_format_check(info: *const SF_INFO) -> c_int;

    // Errors
    pub fn sf_error(sndfile: *mut SNDFILE) -> c_int;
    pub fn sf_strerror(sndfile: *mut SNDFILE) -> *const c_char;
    pub fn sf_error_number(errnum: c_int) -> *const c_char;

    // Command dispatch
    pub fn sf_command(
        sndfile: *mut SNDFILE,
        command: c_int,
        data: *mut c_void,
        datasize: c_int,
    ) -> c_int;

    // Strings
    pub fn sf_get_string(sndfile: *mut SNDFILE, str_type: c_int) -> *const c_char;
    pub fn sf_set_string(sndfile: *mut SNDFILE, str_type: c_int, str_: *const c_char) -> c_int;
    pub fn sf_version_string() -> *const c_char;

    // Positioning
    pub fn sf_seek(sndfile: *mut SNDFILE, frames: sf_count_t, whence: c_int) -> sf_count_t;

    // Item-based I/O
    pub fn sf_read_short(sndfile: *mut SNDFILE, ptr: *mut c_short, items: sf_count_t) -> sf_count_t;
    pub fn sf_read_int(sndfile: *mut SNDFILE, ptr: *mut c_int, items: sf_count_t) -> sf_count_t;
    pub fn sf_read_float(sndfile: *mut SNDFILE, ptr: *mut c_float, items: sf_count_t) -> sf_count_t;
    pub fn sf_read_double(sndfile: *mut SNDFILE, ptr: *mut c_double, items: sf_count_t) -> sf_count_t;
    pub fn sf_write_short(sndfile: *mut SNDFILE, ptr: *const c_short, items: sf_count_t) -> sf_count_t;
    pub fn sf_write_int(sndfile: *mut SNDFILE, ptr: *const c_int, items: sf_count_t) -> sf_count_t;
    pub fn sf_write_float(sndfile: *mut SNDFILE, ptr: *const c_float, items: sf_count_t) -> sf_count_t;
    pub fn sf_write_double(sndfile: *mut SNDFILE, ptr: *const c_double, items: sf_count_t) -> sf_count_t;

    // Frame-based I/O
    pub fn sf_readf_short(sndfile: *mut SNDFILE, ptr: *mut c_short, frames: sf_count_t) -> sf_count_t;
    pub fn sf_readf_int(sndfile: *mut SNDFILE, ptr: *mut c_int, frames: sf_count_t) -> sf_count_t;
    pub fn sf_readf_float(sndfile: *mut SNDFILE, ptr: *mut c_float, frames: sf_count_t) -> sf_count_t;
    pub fn sf_readf_double(sndfile: *mut SNDFILE, ptr: *mut c_double, frames: sf_count_t) -> sf_count_t;
    pub fn sf_writef_short(sndfile: *mut SNDFILE, ptr: *const c_short, frames: sf_count_t) -> sf_count_t;
    pub fn sf_writef_int(sndfile: *mut SNDFILE, ptr: *const c_int, frames: sf_count_t) -> sf_count_t;
    pub fn sf_writef_float(sndfile: *mut SNDFILE, ptr: *const c_float, frames: sf_count_t) -> sf_count_t;
    pub fn sf_writef_double(sndfile: *mut SNDFILE, ptr: *const c_double, frames: sf_count_t) -> sf_count_t;
}
