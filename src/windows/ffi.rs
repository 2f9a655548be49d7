#![allow(non_snake_case, non_camel_case_types, clippy::upper_case_acronyms)]

use std::ffi::c_void;

use winapi::shared::{
    minwindef::{BOOL, DWORD, ULONG},
    ntdef::{HANDLE, HRESULT},
};

/// Leading fields of `MINIDUMP_CALLBACK_INPUT`; the trailing union is never read.
#[repr(C, packed(4))]
pub struct MINIDUMP_CALLBACK_INPUT {
    pub ProcessId: ULONG,
    pub ProcessHandle: HANDLE,
    pub CallbackType: ULONG,
}

/// `MINIDUMP_CALLBACK_OUTPUT` reduced to its `Status` member, which lives at offset 0 of the union.
#[repr(C, packed(4))]
pub struct MINIDUMP_CALLBACK_OUTPUT {
    pub Status: HRESULT,
}

pub type MINIDUMP_CALLBACK_ROUTINE = Option<
    unsafe extern "system" fn(
        CallbackParam: *mut c_void,
        CallbackInput: *const MINIDUMP_CALLBACK_INPUT,
        CallbackOutput: *mut MINIDUMP_CALLBACK_OUTPUT,
    ) -> BOOL,
>;

#[repr(C, packed(4))]
pub struct MINIDUMP_CALLBACK_INFORMATION {
    pub CallbackRoutine: MINIDUMP_CALLBACK_ROUTINE,
    pub CallbackParam: *mut c_void,
}

#[link(name = "dbghelp")]
extern "system" {
    // https://docs.microsoft.com/en-us/windows/win32/api/minidumpapiset/nf-minidumpapiset-minidumpwritedump
    pub fn MiniDumpWriteDump(
        hProcess: HANDLE,
        ProcessId: DWORD,
        hFile: HANDLE,
        DumpType: DWORD,
        ExceptionParam: *mut c_void,
        UserStreamParam: *mut c_void,
        CallbackParam: *const MINIDUMP_CALLBACK_INFORMATION,
    ) -> BOOL;
}
