// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rechannelising delay and bandpass solutions for a beamformer.

use approx::assert_abs_diff_eq;

use gainchain::{
    c64, expand_delay_phase, multiply_gaintable_jones, resample_gaintable,
    set_beamformer_frequencies, ArrayType, InterpAlgorithm, Interpolator, JonesType,
};

use super::make_gaintable;

#[test]
fn test_low_beamformer_jones() {
    // 32 channels of 1 MHz from 125 MHz, like a coarsely averaged SKA-Low
    // bandpass solution.
    let freqs: Vec<f64> = (0..32).map(|i| 125e6 + i as f64 * 1e6).collect();
    let bandpass = make_gaintable(JonesType::B, 2, 4, &freqs, "LOWBD2", |(t, a, ch, r1, r2)| {
        if r1 == r2 {
            let x = (freqs[ch] - 125e6) / 31e6;
            c64::from_polar(1.0 + 0.1 * x + 0.01 * (t + a) as f64, 0.3 * x - 0.1 * a as f64)
        } else {
            c64::new(0.0, 0.0)
        }
    });
    let delays = make_gaintable(JonesType::K, 2, 4, &[150e6], "LOWBD2", |(_, a, _, r1, r2)| {
        if r1 == r2 {
            c64::from_polar(1.0, 0.05 * (a + 1) as f64 * if r1 == 0 { 1.0 } else { -1.0 })
        } else {
            c64::new(0.0, 0.0)
        }
    });

    let freqs_bf = set_beamformer_frequencies(&bandpass, None);
    assert_eq!(
        freqs_bf,
        set_beamformer_frequencies(&bandpass, Some(ArrayType::Low))
    );
    assert_abs_diff_eq!(freqs_bf[0], 125e6);
    assert_eq!(freqs_bf.len(), 40);

    let interp = Interpolator::new(InterpAlgorithm::PolyFit, None, Some(3));
    let bandpass_bf = resample_gaintable(&freqs_bf, &bandpass, &interp).unwrap();
    let delays_bf = expand_delay_phase(&delays, &freqs_bf, true).unwrap();
    assert_eq!(delays_bf.jones_type, JonesType::B);

    let jones = multiply_gaintable_jones(&delays_bf, &bandpass_bf, false).unwrap();
    assert_eq!(jones.gain.dim(), (2, 4, 40, 2, 2));
    assert_eq!(jones.jones_type, JonesType::B);
    assert_eq!(jones.frequency.as_slice(), freqs_bf.as_slice());
    assert_eq!(jones.phasecentre, bandpass.phasecentre);
    assert!(jones.gain.iter().all(|g| g.re.is_finite() && g.im.is_finite()));

    // At the delay reference frequency the delay term vanishes, so the
    // product is the bandpass alone.
    let i_ref = freqs_bf
        .iter()
        .position(|&f| (f - 150e6).abs() < 1.0)
        .unwrap();
    for t in 0..2 {
        for a in 0..4 {
            for r in 0..2 {
                assert_abs_diff_eq!(
                    jones.gain[(t, a, i_ref, r, r)],
                    bandpass_bf.gain[(t, a, i_ref, r, r)],
                    epsilon = 1e-12
                );
            }
        }
    }

    // The inputs are untouched.
    assert_eq!(bandpass.num_chans(), 32);
    assert_eq!(delays.jones_type, JonesType::K);
}

#[test]
fn test_mid_beamformer_frequencies() {
    let freqs: Vec<f64> = (0..4).map(|i| 950e6 + i as f64 * 1e6).collect();
    let gt = make_gaintable(JonesType::G, 1, 2, &freqs, "MID", |_| c64::new(1.0, 0.0));
    let freqs_bf = set_beamformer_frequencies(&gt, None);
    assert_abs_diff_eq!(freqs_bf[0], 950e6);
    assert_abs_diff_eq!(freqs_bf[1] - freqs_bf[0], 300e6 / 4096.0, epsilon = 1e-6);

    let bf = resample_gaintable(&freqs_bf, &gt, &Interpolator::Linear).unwrap();
    assert_eq!(bf.num_chans(), freqs_bf.len());
    for &g in &bf.gain {
        assert_abs_diff_eq!(g, c64::new(1.0, 0.0), epsilon = 1e-12);
    }
}
