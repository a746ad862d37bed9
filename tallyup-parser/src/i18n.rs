#[cfg(all(feature = "ja", feature = "en"))]
compile_error!("Cannot enable both 'ja' and 'en' features at the same time");

#[cfg(feature = "ja")]
pub fn syntax_error_detail(error: impl std::fmt::Display) -> String {
    format!("解析できませんでした: {error}")
}

#[cfg(feature = "ja")]
pub fn syntax_error_unparsed_detail(input: impl std::fmt::Display) -> String {
    format!("解析されていない入力: {input}")
}

#[cfg(not(feature = "ja"))]
pub fn syntax_error_detail(error: impl std::fmt::Display) -> String {
    format!("could not parse statement: {error}")
}

#[cfg(not(feature = "ja"))]
pub fn syntax_error_unparsed_detail(input: impl std::fmt::Display) -> String {
    format!("unparsed input: {input}")
}
