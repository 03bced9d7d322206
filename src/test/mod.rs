mod dispatch;
mod scenario_spec;
mod sim_time;
