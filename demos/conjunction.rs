use conic_sim::{body_presets, Body, BodyId, BodyRegistry, OrbitalElements, StateVectors2D, Time};

const WINDOW: Time = 60;
const SCAN_WINDOWS: Time = 200;

fn main() {
    let mut registry = BodyRegistry::default();

    let sol = registry.add_body(body_presets::stars::sol()).unwrap();
    let terra = registry.add_body(body_presets::planets::terra(sol)).unwrap();
    registry.add_body(body_presets::moons::luna(terra)).unwrap();

    let station = registry
        .add_body(Body::new(
            "Station".to_string(),
            4.2e5,
            50.0,
            OrbitalElements::new(7.0e6, 0.0, 0.0, 0.0, 0, terra),
        ))
        .unwrap();
    let probe = registry
        .add_body(Body::new(
            "Probe".to_string(),
            1.0e3,
            1.0,
            OrbitalElements::new(7.2e6, 0.05, 0.3, 1.0, 0, terra),
        ))
        .unwrap();

    describe_registry(&registry);

    let crossing = registry.next_time_at_radius(probe, 0, 7.0e6).unwrap();
    match crossing {
        Some(time) => println!("Probe reaches the station's altitude at t={time}s"),
        None => println!("Probe never reaches the station's altitude"),
    }

    scan_for_conjunctions(&registry, station, probe, 0);

    // Raise the probe's orbit with a prograde burn
    let burn_time = 1_000;
    let before = registry.state_vectors_of(probe, burn_time).unwrap();
    let after = StateVectors2D {
        position: before.position,
        velocity: before.velocity * 1.05,
    };
    let refitted = registry.refit_orbit(probe, after, burn_time).unwrap();

    println!(
        "After the burn at t={burn_time}s: a = {:.0} m, e = {:.4}",
        refitted.semi_major_axis(),
        refitted.eccentricity(),
    );

    scan_for_conjunctions(&registry, station, probe, burn_time);
}

fn describe_registry(registry: &BodyRegistry) {
    println!("{registry}");

    let mut bodies: Vec<(BodyId, &Body)> = registry.bodies().collect();
    bodies.sort_by_key(|(id, _)| *id);

    for (id, body) in bodies {
        println!("    {id}: {:?}", body.name);
        println!("      Mass: {}", body.mass);
        println!("      Radius: {}", body.radius);
        if let Some(orbit) = body.orbit.elements() {
            println!("      Orbiting: {}", orbit.central_body());
            println!("        Semi-major axis: {}", orbit.semi_major_axis());
            println!("        Eccentricity: {}", orbit.eccentricity());
            println!("        Argument of periapsis: {}", orbit.arg_pe());
            println!(
                "        Mean anomaly at epoch: {}",
                orbit.mean_anomaly_at_epoch()
            );
            println!(
                "        Position at epoch: {:?}",
                registry.absolute_position_of(id, orbit.epoch()).unwrap()
            );
        }
    }
}

fn scan_for_conjunctions(registry: &BodyRegistry, a: BodyId, b: BodyId, start: Time) {
    let mut closest: Option<(Time, f64)> = None;

    for i in 0..SCAN_WINDOWS {
        let window_start = start + i * WINDOW;
        let approach = registry
            .closest_approach(a, b, window_start, WINDOW)
            .unwrap();
        let time = window_start + approach.time.round() as Time;
        let distance = approach.distance();

        if closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((time, distance));
        }
    }

    if let Some((time, distance)) = closest {
        println!(
            "Closest approach between {a} and {b} after t={start}s: {distance:.1} m at t~{time}s"
        );
    }
}
