#[doc(hidden)]
#[allow(unused_macros)]
macro_rules! changes {
    () => ($crate::change_set::ChangeSet::new());
    ( $( $field:expr => $value:expr ),+ $(,)?) => {
        {
            let mut temp_changes = $crate::change_set::ChangeSet::new();
            $(
                temp_changes.insert($field, $value);
            )*
            temp_changes
        }
    };
}

#[doc(hidden)]
#[allow(unused_macros)]
macro_rules! names {
    () => ($crate::name_table::NameTranslationTable::new());
    ( $( $field:expr => $column:expr ),+ $(,)?) => {
        {
            let mut temp_names = $crate::name_table::NameTranslationTable::new();
            $(
                temp_names.insert($field, $column);
            )*
            temp_names
        }
    };
}

#[doc(hidden)]
#[allow(unused_macros)]
macro_rules! result_to_error {
    ($value:expr) => {
        match $value {
            Ok(v) => v,
            Err(e) => return e,
        }
    };
    ($value:expr, $error:expr) => {
        match $value {
            Ok(v) => v,
            Err(_) => return $error,
        }
    };
}

#[doc(hidden)]
#[allow(unused_macros)]
macro_rules! option_to_error {
    ($value:expr) => {
        match $value {
            Some(v) => v,
            None => return,
        }
    };
    ($value:expr, $error:expr) => {
        match $value {
            Some(v) => v,
            None => return $error,
        }
    };
}
