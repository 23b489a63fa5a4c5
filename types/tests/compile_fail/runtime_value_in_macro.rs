use notnull_types::{NotNull, not_null};

fn wrap(runtime: *const u8) -> NotNull<*const u8> {
    not_null!(runtime)
}

fn main() {
    let value = 1_u8;
    let _app = wrap(&value);
}
