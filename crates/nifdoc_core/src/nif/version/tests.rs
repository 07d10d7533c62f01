use crate::nif::NifError;
use crate::nif::version::{NEOSTEAM_VERSION, VersionContext, format_version_string, parse_header_signature, parse_version_token, v};

#[test]
fn parses_dotted_signature_versions() {
	let (raw, version) = parse_header_signature("NetImmerse File Format, Version 4.0.0.2").expect("signature parses");
	assert_eq!(version, 0x0400_0002);
	assert_eq!(&*raw, "NetImmerse File Format, Version 4.0.0.2");

	let (_, version) = parse_header_signature("Gamebryo File Format, Version 20.2.0.7").expect("signature parses");
	assert_eq!(version, v::V20_2_0_7);

	let (_, version) = parse_header_signature("NDSNIF....@....@...., Version 20.3.0.9").expect("signature parses");
	assert_eq!(version, v::V20_3_0_9);
}

#[test]
fn neosteam_signature_maps_to_fixed_version() {
	let (_, version) = parse_header_signature("NS").expect("neosteam");
	assert_eq!(version, 0x0A01_0000);
	assert_eq!(version, NEOSTEAM_VERSION);
}

#[test]
fn short_legacy_tokens_use_their_own_packing() {
	assert_eq!(parse_version_token("3.03").expect("3.03"), 0x0300_0300);
	assert_eq!(parse_version_token("3.1").expect("3.1"), 0x0301_0000);
	assert_eq!(parse_version_token("10.1").expect("two components"), 0x0A01_0000);
	assert_eq!(parse_version_token("20.0.0").expect("three components"), 0x1400_0000);
}

#[test]
fn format_then_parse_round_trips_every_named_version() {
	for &version in v::ALL {
		let text = format!("Gamebryo File Format, Version {}", format_version_string(version));
		let (_, parsed) = parse_header_signature(&text).expect("round trip");
		assert_eq!(parsed, version, "{}", format_version_string(version));
	}
}

#[test]
fn rejects_unknown_prefix_and_bad_tokens() {
	let err = parse_header_signature("Blender File, Version 4.0.0.2").expect_err("bad prefix");
	assert!(matches!(err, NifError::InvalidHeader { .. }));

	let err = parse_header_signature("Gamebryo File Format").expect_err("no token");
	assert!(matches!(err, NifError::InvalidHeader { .. }));

	let err = parse_header_signature("Gamebryo File Format, Version 20.x").expect_err("bad token");
	assert!(matches!(err, NifError::UnsupportedVersion { .. }));

	assert!(parse_version_token("1.2.3.4.5").is_err());
	assert!(parse_version_token("256.0").is_err());
}

#[test]
fn at_least_is_negation_of_at_most_below() {
	let samples: Vec<u32> = v::ALL.iter().flat_map(|&version| [version.saturating_sub(1), version, version + 1]).collect();

	for &sample in &samples {
		let ctx = VersionContext::new(sample);
		for &gate in v::ALL {
			assert_eq!(
				ctx.at_least(gate),
				!ctx.at_most(gate - 1),
				"sample {} gate {}",
				format_version_string(sample),
				format_version_string(gate)
			);
		}
	}
}

#[test]
fn named_versions_are_strictly_ascending() {
	assert!(v::ALL.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn user_predicates_are_inclusive() {
	let ctx = VersionContext::new(v::V20_2_0_7).with_user(12, 83);
	assert!(ctx.in_range(v::V20_2_0_7, v::V20_2_0_7));
	assert!(ctx.user_at_least(12) && ctx.user_at_most(12));
	assert!(ctx.user2_in_range(83, 83));
	assert!(ctx.is_skyrim_or_later());
	assert!(!VersionContext::new(v::V20_2_0_7).with_user(11, 34).is_skyrim_or_later());
}
