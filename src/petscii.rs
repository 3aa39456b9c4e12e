/// PETSCII to host text conversion
///
/// Directory names and boot sector strings are stored as PETSCII bytes.
/// Printable characters in the range 32-95 coincide with ASCII; everything
/// else is shown as a `{name}` escape, or `{$xx}` when the code has no name.

/// Named control codes
const CONTROL_NAMES: &[(u8, &str)] = &[
    (5, "{white}"),
    (14, "{lowercase}"),
    (17, "{down}"),
    (18, "{rvson}"),
    (19, "{home}"),
    (20, "{delete}"),
    (28, "{red}"),
    (29, "{right}"),
    (30, "{green}"),
    (31, "{blue}"),
    (92, "{pound}"),
    (94, "{uparr}"),
    (95, "{leftarr}"),
    (126, "{pi}"),
    (129, "{orange}"),
    (133, "{F1}"),
    (134, "{F3}"),
    (135, "{F5}"),
    (136, "{F7}"),
    (137, "{F2}"),
    (138, "{F4}"),
    (139, "{F6}"),
    (140, "{F8}"),
    (141, "{shift-enter}"),
    (142, "{uppercase}"),
    (144, "{black}"),
    (145, "{up}"),
    (146, "{rvsoff}"),
    (147, "{clr}"),
    (148, "{ins}"),
    (149, "{brown}"),
    (150, "{lred}"),
    (151, "{grey1}"),
    (152, "{grey2}"),
    (153, "{lgreen}"),
    (154, "{lblue}"),
    (155, "{grey3}"),
    (156, "{purple}"),
    (157, "{left}"),
    (158, "{yellow}"),
    (159, "{cyan}"),
    (160, "{shift-space}"),
];

/// Quote a single PETSCII code for display
pub fn quote(code: u8) -> String {
    // 92, 94 and 95 differ from ASCII and carry names of their own
    if let Some((_, name)) = CONTROL_NAMES.iter().find(|(c, _)| *c == code) {
        return (*name).to_string();
    }
    if (32..=95).contains(&code) {
        (code as char).to_string()
    } else {
        format!("{{${:02x}}}", code)
    }
}

/// Convert a PETSCII byte string into a host-printable string
pub fn to_display_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| quote(b)).collect()
}
