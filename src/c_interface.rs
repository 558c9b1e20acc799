use std::{
    ffi::CStr,
    os::raw::{c_char, c_int},
    ptr::null_mut,
};

use crate::{
    change_set::ChangeSet,
    compiler::{ColumnPolicy, CompiledUpdate, PartialUpdateCompiler},
    error::Error,
    name_table::NameTranslationTable,
};

pub const PARTIAL_UPDATE_OK: c_int = 0;
pub const PARTIAL_UPDATE_NULL_ARGUMENT: c_int = 1;
pub const PARTIAL_UPDATE_INVALID_UTF_8: c_int = 2;
pub const PARTIAL_UPDATE_INVALID_JSON: c_int = 3;
pub const PARTIAL_UPDATE_BAD_REQUEST: c_int = 4;
pub const PARTIAL_UPDATE_BUFFER_TOO_SMALL: c_int = 5;
pub const PARTIAL_UPDATE_SERIALIZATION_ERROR: c_int = 6;
pub const PARTIAL_UPDATE_INTERNAL_ERROR: c_int = 7;

unsafe fn read_str<'a>(string: *const c_char) -> Result<&'a str, c_int> {
    if string.is_null() {
        return Err(PARTIAL_UPDATE_NULL_ARGUMENT);
    }
    CStr::from_ptr(string)
        .to_str()
        .map_err(|_| PARTIAL_UPDATE_INVALID_UTF_8)
}

fn error_code(error: Error) -> c_int {
    match error {
        Error::BadRequest(_) => PARTIAL_UPDATE_BAD_REQUEST,
        Error::Json(_) => PARTIAL_UPDATE_INVALID_JSON,
        Error::Io(_) => PARTIAL_UPDATE_INTERNAL_ERROR,
    }
}

/// Compiles the JSON object `changes_json` using the JSON object `names_json` as the translation
/// table. `names_json` may be null, meaning no translations. A non-zero `strict` rejects columns
/// that are not plain identifiers. On success `*compiled` owns the result and must be released
/// with `free_compiled_update`.
#[no_mangle]
pub unsafe extern "C" fn compile_partial_update(
    changes_json: *const c_char,
    names_json: *const c_char,
    strict: c_int,
    compiled: *mut *mut CompiledUpdate,
) -> c_int {
    if compiled.is_null() {
        return PARTIAL_UPDATE_NULL_ARGUMENT;
    }
    let changes = result_to_error!(read_str(changes_json));
    let changes = result_to_error!(ChangeSet::from_json(changes), PARTIAL_UPDATE_INVALID_JSON);
    let names = if names_json.is_null() {
        NameTranslationTable::new()
    } else {
        let names = result_to_error!(read_str(names_json));
        result_to_error!(
            NameTranslationTable::from_json(names),
            PARTIAL_UPDATE_INVALID_JSON
        )
    };
    let policy = if strict != 0 {
        ColumnPolicy::Identifier
    } else {
        ColumnPolicy::Trusted
    };
    match PartialUpdateCompiler::with_policy(policy).compile(&changes, &names) {
        Ok(result) => {
            *compiled = Box::into_raw(Box::new(result));
            PARTIAL_UPDATE_OK
        }
        Err(e) => error_code(e),
    }
}

/// Writes the number of bound values to `num_values`.
#[no_mangle]
pub unsafe extern "C" fn compiled_num_values(
    compiled: *const CompiledUpdate,
    num_values: *mut usize,
) -> c_int {
    let compiled = option_to_error!(compiled.as_ref(), PARTIAL_UPDATE_NULL_ARGUMENT);
    let num_values = option_to_error!(num_values.as_mut(), PARTIAL_UPDATE_NULL_ARGUMENT);
    *num_values = compiled.num_params();
    PARTIAL_UPDATE_OK
}

/// Copies the assignment clause into `buffer`.
/// `PARTIAL_UPDATE_BUFFER_TOO_SMALL` is returned if it does not fit, including the terminator.
#[no_mangle]
pub unsafe extern "C" fn compiled_assignment_clause(
    compiled: *const CompiledUpdate,
    buffer: *mut c_char,
    buffer_len: usize,
) -> c_int {
    let compiled = option_to_error!(compiled.as_ref(), PARTIAL_UPDATE_NULL_ARGUMENT);
    result_to_error!(fill_buffer(compiled.assignment_clause(), buffer, buffer_len))
}

/// Copies the bound values, as a JSON array, into `buffer`.
/// `PARTIAL_UPDATE_BUFFER_TOO_SMALL` is returned if they do not fit, including the terminator.
#[no_mangle]
pub unsafe extern "C" fn compiled_values_json(
    compiled: *const CompiledUpdate,
    buffer: *mut c_char,
    buffer_len: usize,
) -> c_int {
    let compiled = option_to_error!(compiled.as_ref(), PARTIAL_UPDATE_NULL_ARGUMENT);
    let json = result_to_error!(
        serde_json::to_string(compiled.values()),
        PARTIAL_UPDATE_SERIALIZATION_ERROR
    );
    result_to_error!(fill_buffer(&json, buffer, buffer_len))
}

/// Frees the compiled update and nulls the pointer. This function should always succeed.
#[no_mangle]
pub unsafe extern "C" fn free_compiled_update(compiled: *mut *mut CompiledUpdate) {
    let compiled = option_to_error!(compiled.as_mut());
    if !compiled.is_null() {
        let _ = Box::<CompiledUpdate>::from_raw(*compiled);
    }
    *compiled = null_mut()
}

unsafe fn fill_buffer(
    string: &str,
    mut buffer: *mut c_char,
    buffer_len: usize,
) -> Result<c_int, c_int> {
    if buffer.is_null() {
        return Err(PARTIAL_UPDATE_NULL_ARGUMENT);
    }
    if buffer_len == 0 {
        return Err(PARTIAL_UPDATE_BUFFER_TOO_SMALL);
    }
    for byte in string.bytes().take(buffer_len - 1) {
        *buffer = byte as c_char;
        buffer = buffer.add(1);
    }
    *buffer = 0;
    if string.len() >= buffer_len {
        Err(PARTIAL_UPDATE_BUFFER_TOO_SMALL)
    } else {
        Ok(PARTIAL_UPDATE_OK)
    }
}
