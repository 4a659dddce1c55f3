pub fn print_banner(version: &str) {
    let banner = format!(
        r#"
 ♪  ┌┐ ┬┌┐ ┬  ┬┌─┐┌┬┐┌─┐┌─┐┌─┐
    ├┴┐│├┴┐│  ││ │ │ ├┤ │  ├─┤    biblioteca musical católica
    └─┘┴└─┘┴─┘┴└─┘ ┴ └─┘└─┘┴ ┴    v{}
"#,
        version
    );

    tracing::info!("{}", banner);
}
