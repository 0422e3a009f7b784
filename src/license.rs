//! Version and license text printed by the informational flags.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logged once at startup.
pub fn greeter() -> String {
    format!("vpnquery {}, VPN dial-in authorization check", VERSION)
}

pub const LICENSE_TEXT: &str = "\
vpnquery is dual-licensed under the MIT license and the Apache License,
Version 2.0, at your option.

MIT: Permission is hereby granted, free of charge, to any person obtaining a
copy of this software and associated documentation files, to deal in the
Software without restriction, subject to the condition that the copyright
notice and this permission notice are included in all copies or substantial
portions of the Software.

Apache-2.0: Licensed under the Apache License, Version 2.0; you may not use
this software except in compliance with the License. You may obtain a copy of
the License at http://www.apache.org/licenses/LICENSE-2.0

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED.
";
