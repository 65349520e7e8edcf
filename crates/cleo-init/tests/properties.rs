use proptest::prelude::*;

use cleo_config::Constants;
use cleo_init::generators::{DiracDelta, EvenlySpaced, Monodisperse};
use cleo_init::profiles::{ConstUniformThermo, ConstUniformWinds, Humidity};
use cleo_init::{
    AttributeGenerator, AxisSpec, GridSpec, NsupersPerGridbox, generate_superdroplets,
    generate_thermodynamics,
};
use cleo_model::{Axis, ThermoVariable, expected_field_len};

fn arb_linear() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1000.0..1000.0_f64, 0.1..1000.0_f64, 0.5..100.0_f64)
        .prop_map(|(min, span, delta)| (min, min + span, delta))
}

fn arb_grid() -> impl Strategy<Value = GridSpec> {
    (arb_linear(), 1..4_usize, 1..4_usize).prop_map(|((min, max, delta), nx, ny)| {
        let cells = |n: usize| AxisSpec::Explicit((0..=n).map(|i| i as f64 * 10.0).collect());
        GridSpec::new(AxisSpec::linear(min, max, delta), cells(nx), cells(ny))
    })
}

proptest! {
    #[test]
    fn prop_linear_halfcoords_cover_the_range((min, max, delta) in arb_linear()) {
        let h = AxisSpec::linear(min, max, delta).halfcoords(Axis::Z).unwrap();
        prop_assert!(h.len() >= 2);
        prop_assert_eq!(h[0], min);
        prop_assert!(h.windows(2).all(|w| w[0] < w[1]));
        // the last boundary closes the domain, the one before lies inside it
        prop_assert!(h[h.len() - 1] >= max - 1e-8 * (max - min + delta));
        prop_assert!(h[h.len() - 2] < max);
    }

    #[test]
    fn prop_generated_superdroplets_fill_every_gridbox(grid in arb_grid(), nsupers in 1..4_usize) {
        let geometry = grid.geometry().unwrap();
        let generator = AttributeGenerator::new(
            Monodisperse::new(1e-6),
            Monodisperse::new(1e-7),
            DiracDelta::new(1e-6),
        )
        .with_coord(EvenlySpaced)
        .with_coord(EvenlySpaced);
        let set = generate_superdroplets(
            &generator,
            &geometry,
            &NsupersPerGridbox::Uniform(nsupers),
            2,
            1e6,
            &Constants::cleo_defaults(),
        )
        .unwrap();
        prop_assert_eq!(set.len(), nsupers * geometry.ngridboxes());
        prop_assert_eq!(set.nspacedims(), 2);
        for (i, droplet) in set.iter().enumerate() {
            prop_assert_eq!(droplet.sdgbxindex as usize, i / nsupers);
        }
    }

    #[test]
    fn prop_winds_are_staggered(grid in arb_grid(), ntimesteps in 1..4_usize) {
        let geometry = grid.geometry().unwrap();
        let thermo = ConstUniformThermo::new(100_000.0, 290.0, Humidity::Qvap(0.01), 0.0);
        let winds = ConstUniformWinds::new(Some(1.0), Some(2.0), Some(3.0));
        let fields = generate_thermodynamics(
            &geometry,
            ntimesteps,
            &thermo,
            Some(&winds),
            &Constants::cleo_defaults(),
        )
        .unwrap();
        for (variable, values) in fields.fields() {
            prop_assert_eq!(
                values.len(),
                expected_field_len(variable, geometry.ndims(), ntimesteps)
            );
        }
        prop_assert_eq!(fields.fields().count(), ThermoVariable::ALL.len());
    }
}
