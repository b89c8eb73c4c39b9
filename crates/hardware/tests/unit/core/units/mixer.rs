//! Carrier mixer tests.

use gpsbb_core::common::signal::{CarrierRef, IfSample, RefLevel};
use gpsbb_core::core::units::mixer::CarrierMixer;
use rstest::rstest;

const SAMPLES: [(u8, u8); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];
const LEVELS: [i8; 4] = [-2, -1, 1, 2];

#[rstest]
#[case(3)]
#[case(5)]
fn product_matches_signed_multiply(#[case] high: i16) {
    let mixer = CarrierMixer::new(high);
    for (sign, mag) in SAMPLES {
        let s = IfSample::from_bits(sign, mag);
        for level in LEVELS {
            assert_eq!(
                mixer.product(s, RefLevel::from_value(level)),
                s.value(high) * i16::from(level),
                "sample {sign}{mag} level {level}"
            );
        }
    }
}

#[test]
fn mix_forms_both_arms() {
    let mixer = CarrierMixer::default();
    let carrier = CarrierRef {
        i: RefLevel::from_value(2),
        q: RefLevel::from_value(-1),
    };
    assert_eq!(mixer.mix(IfSample::from_bits(1, 1), carrier), (6, -3));
    assert_eq!(mixer.mix(IfSample::from_bits(0, 0), carrier), (-2, 1));
}
