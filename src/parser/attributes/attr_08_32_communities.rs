use crate::error::DecodeError;
use crate::models::*;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

fn parse_text_list<T>(attr_type: AttrType, value: &Value) -> Result<Vec<T>, DecodeError>
where
    T: FromStr<Err = DecodeError>,
{
    Vec::<String>::deserialize(value)
        .map_err(|e| DecodeError::invalid_attribute(attr_type.into(), e))?
        .iter()
        .map(|text| T::from_str(text))
        .collect()
}

/// Decodes the COMMUNITY value of an MRT record, a list of `"ASN:VALUE"` strings.
pub(crate) fn parse_communities(value: &Value) -> Result<Vec<Community>, DecodeError> {
    parse_text_list(AttrType::COMMUNITIES, value)
}

/// Decodes the LARGE_COMMUNITY value of an MRT record, a list of `"GLOBAL:DATA1:DATA2"` strings.
pub(crate) fn parse_large_communities(value: &Value) -> Result<Vec<LargeCommunity>, DecodeError> {
    parse_text_list(AttrType::LARGE_COMMUNITIES, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_communities() {
        assert_eq!(
            parse_communities(&json!(["6695:1911", "65000:1"])).unwrap(),
            vec![Community(6695, 1911), Community(65000, 1)]
        );
        assert_eq!(
            parse_large_communities(&json!(["6695:1911:90"])).unwrap(),
            vec![LargeCommunity(6695, 1911, 90)]
        );
        assert!(matches!(
            parse_communities(&json!(["6695"])),
            Err(DecodeError::InvalidCommunity(_))
        ));
        assert!(matches!(
            parse_large_communities(&json!("6695:1911:90")),
            Err(DecodeError::InvalidAttribute { attr_type: 32, .. })
        ));
    }
}
