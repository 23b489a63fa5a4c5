use notnull_types::NotNull;

const _: NotNull<*const u8> = NotNull::new_const(std::ptr::null());

fn main() {}
