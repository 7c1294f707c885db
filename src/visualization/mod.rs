pub mod rbsim_vis3d;
