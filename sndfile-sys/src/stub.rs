//! Stand-ins compiled when libsndfile was not available at build time.
//!
//! Every function has the native signature and reports failure: opens return
//! null, commands return -1, I/O moves zero items. This keeps dependents
//! buildable (docs.rs, CI without the library) without pretending to work.

use std::ptr;

use libc::{c_char, c_double, c_float, c_int, c_short, c_void};

use crate::{sf_count_t, SF_ERR_SYSTEM, SF_INFO, SNDFILE};

const STUB_MESSAGE: &[u8] = b"libsndfile is not linked (stub build)\0";

fn stub_message() -> *const c_char {
    STUB_MESSAGE.as_ptr().cast()
}

pub unsafe extern "C" fn sf_open(
    _path: *const c_char,
    _mode: c_int,
    _sfinfo: *mut SF_INFO,
) -> *mut SNDFILE {
    ptr::null_mut()
}

pub unsafe extern "C" fn sf_open_fd(
    _fd: c_int,
    _mode: c_int,
    _sfinfo: *mut SF_INFO,
    _close_desc: c_int,
) -> *mut SNDFILE {
    ptr::null_mut()
}

pub unsafe extern "C" fn sf_close(_sndfile: *mut SNDFILE) -> c_int {
    SF_ERR_SYSTEM
}

pub unsafe extern "C" fn sf_write_sync(_sndfile: *mut SNDFILE) {}

pub unsafe extern "C" fn sf_format_check(_info: *const SF_INFO) -> c_int {
    0
}

pub unsafe extern "C" fn sf_error(_sndfile: *mut SNDFILE) -> c_int {
    SF_ERR_SYSTEM
}

pub unsafe extern "C" fn sf_strerror(_sndfile: *mut SNDFILE) -> *const c_char {
    stub_message()
}

pub unsafe extern "C" fn sf_error_number(_errnum: c_int) -> *const c_char {
    stub_message()
}

pub unsafe extern "C" fn sf_command(
    _sndfile: *mut SNDFILE,
    _command: c_int,
    _data: *mut c_void,
    _datasize: c_int,
) -> c_int {
    -1
}

pub unsafe extern "C" fn sf_get_string(_sndfile: *mut SNDFILE, _str_type: c_int) -> *const c_char {
    ptr::null()
}

pub unsafe extern "C" fn sf_set_string(
    _sndfile: *mut SNDFILE,
    _str_type: c_int,
    _str: *const c_char,
) -> c_int {
    SF_ERR_SYSTEM
}

pub unsafe extern "C" fn sf_version_string() -> *const c_char {
    stub_message()
}

pub unsafe extern "C" fn sf_seek(_sndfile: *mut SNDFILE, _frames: sf_count_t, _whence: c_int) -> sf_count_t {
    -1
}

macro_rules! stub_io {
    ($($name:ident($ptr:ty);)*) => {
        $(
            pub unsafe extern "C" fn $name(_sndfile: *mut SNDFILE, _ptr: $ptr, _count: sf_count_t) -> sf_count_t {
                0
            }
        )*
    };
}

stub_io! {
    sf_read_short(*mut c_short);
    sf_read_int(*mut c_int);
    sf_read_float(*mut c_float);
    sf_read_double(*mut c_double);
    sf_write_short(*const c_short);
    sf_write_int(*const c_int);
    sf_write_float(*const c_float);
    sf_write_double(*const c_double);
    sf_readf_short(*mut c_short);
    sf_readf_int(*mut c_int);
    sf_readf_float(*mut c_float);
    sf_readf_double(*mut c_double);
    sf_writef_short(*const c_short);
    sf_writef_int(*const c_int);
    sf_writef_float(*const c_float);
    sf_writef_double(*const c_double);
}
